//! Gallery command - the image grid view of a vault.
//!
//! Image files are shown by name with their preview status; other files get a
//! generic placeholder tile. Tiles are laid out in rows of `--columns`.

use anyhow::Result;
use clap::Args as ClapArgs;
use comfy_table::{Cell, CellAlignment};
use serde::Serialize;
use tracing::instrument;

use wvault_core::fs::preview::GALLERY_COLUMNS;
use wvault_core::fs::{Gallery, GalleryItem, PreviewKind};
use wvault_core::vault::Session;

use crate::output::gallery_table;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Tiles per row
    #[arg(long, default_value_t = GALLERY_COLUMNS)]
    pub columns: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct GalleryOutput<'a> {
    vault: &'a str,
    columns: usize,
    images: usize,
    #[serde(flatten)]
    gallery: &'a Gallery,
}

#[instrument(level = "info", name = "cmd::gallery", skip_all, fields(columns = args.columns))]
pub fn execute(session: &mut Session, args: &Args) -> Result<()> {
    session.show_gallery();
    let gallery = session.gallery()?;

    if args.json {
        let output = GalleryOutput {
            vault: session.vault_name(),
            columns: args.columns,
            images: gallery.image_count(),
            gallery: &gallery,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if gallery.is_empty() {
        println!("No files yet.");
        return Ok(());
    }

    let mut table = gallery_table();
    for row in gallery.rows(args.columns) {
        table.add_row(row.iter().map(tile));
    }
    println!("{table}");

    Ok(())
}

fn tile(item: &GalleryItem) -> Cell {
    let badge = match item.kind {
        PreviewKind::Image => "[image]",
        PreviewKind::Unavailable => "[preview not available]",
        PreviewKind::File => "[file]",
    };
    Cell::new(format!("{badge}\n{}", item.name)).set_alignment(CellAlignment::Center)
}
