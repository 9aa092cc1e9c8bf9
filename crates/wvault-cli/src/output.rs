//! Table and size formatting for `ls -l` and `gallery`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};

const SIZE_UNITS: [&str; 4] = ["K", "M", "G", "T"];

fn rounded_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Long listing: right-aligned size column, then the file name.
pub fn file_table() -> Table {
    let mut table = rounded_table();
    table.set_header(vec!["Size", "Name"]);
    if let Some(size) = table.column_mut(0) {
        size.set_cell_alignment(CellAlignment::Right);
    }
    table
}

/// Headerless grid of gallery tiles.
pub fn gallery_table() -> Table {
    rounded_table()
}

/// Binary-prefixed size with one decimal: `512B`, `1.5K`, `3.0G`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes}B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = SIZE_UNITS[0];
    for &next in &SIZE_UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1}{unit}")
}
