use clap::{Args, Parser, Subcommand};
use image::RgbaImage;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use closet::imaging::{self, prepare};
use closet::state::backup::DEFAULT_EXPORT_FILE_NAME;
use closet::state::data::category;
use closet::{ClosetConfig, ClosetStore, ColorSampler, NewClothingItem, Outfit, Slot, StorageLocation};

/// Command line front end for the virtual closet
#[derive(Parser, Debug)]
#[command(name = "closet")]
#[command(about = "Cut clothing photos out of their background and keep them in a wardrobe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Use this database file instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove the background of a photo and save it as PNG
    RemoveBg {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        pick: BackgroundPick,
    },
    /// Add a clothing item from a photo
    Add {
        #[arg(long, value_parser = parse_label)]
        name: String,
        /// Category label, e.g. Top, Bottom, Outerwear, Shoes, Accessory
        #[arg(long, value_parser = parse_label)]
        category: String,
        /// Photo of the item
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        pick: BackgroundPick,
    },
    /// List stored items
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Save a stored item's image as a PNG file
    Show { id: i64, output: PathBuf },
    /// Delete an item by ID
    Delete { id: i64 },
    /// Write a JSON backup of the whole closet
    Export { path: Option<PathBuf> },
    /// Replace the whole closet with a JSON backup
    Import { path: PathBuf },
    /// Compose an outfit from item IDs
    Outfit {
        #[arg(long)]
        top: Option<i64>,
        #[arg(long)]
        bottom: Option<i64>,
        #[arg(long)]
        outerwear: Option<i64>,
        #[arg(long)]
        shoes: Option<i64>,
        /// May be repeated
        #[arg(long = "accessory")]
        accessories: Vec<i64>,
    },
}

/// How the background color is picked
#[derive(Args, Debug)]
struct BackgroundPick {
    /// Use the color of a single pixel
    #[arg(long, value_parser = parse_point, conflicts_with = "drag")]
    at: Option<(u32, u32)>,
    /// Average the colors along a dragged path of points
    #[arg(long, value_parser = parse_point, num_args = 1..)]
    drag: Vec<(u32, u32)>,
}

fn parse_point(s: &str) -> Result<(u32, u32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok((x, y))
}

/// Names and categories must not be blank
fn parse_label(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("please enter a name and choose a category".to_string());
    }
    Ok(s.to_string())
}

impl BackgroundPick {
    /// Apply the chosen background removal, if any
    fn apply(&self, image: &mut RgbaImage) {
        if let Some((x, y)) = self.at {
            match imaging::remove_background_at(image, x, y) {
                Some(matched) => info!(matched, "background removed from clicked color"),
                None => warn!(x, y, "point is outside the image, nothing removed"),
            }
            return;
        }

        if self.drag.is_empty() {
            return;
        }

        let mut sampler = ColorSampler::new();
        sampler.begin();
        for &(x, y) in &self.drag {
            sampler.sample(image, x, y);
        }
        match sampler.finish() {
            Some(reference) => {
                let matched = imaging::remove_background(image, reference);
                info!(matched, samples = self.drag.len(), "background removed from dragged color");
            }
            None => warn!("no dragged point was inside the image, nothing removed"),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> closet::Result<()> {
    let mut config = ClosetConfig::load()?;
    if let Some(db) = cli.db {
        config.database = StorageLocation::File(db);
    }
    let store = ClosetStore::new(config);
    let max_dimension = store.config().max_upload_dimension;
    debug!(location = %store.location(), "using wardrobe catalog");

    match cli.command {
        Command::RemoveBg { input, output, pick } => {
            let mut image = prepare::load_for_editing(&input, max_dimension)?;
            pick.apply(&mut image);
            image.save(&output)?;
            info!(path = %output.display(), "saved");
        }
        Command::Add {
            name,
            category,
            image,
            pick,
        } => {
            let mut photo = prepare::load_for_editing(&image, max_dimension)?;
            pick.apply(&mut photo);
            let uri = prepare::encode_data_uri(&photo)?;
            let id = store.add(&NewClothingItem::now(name, category, uri)).await?;
            println!("Item saved with id {id}");
        }
        Command::List { category } => {
            let items = match category {
                Some(category) => store.get_by_category(&category).await?,
                None => store.get_all().await?,
            };
            for item in &items {
                println!("{:>5}  {:<12} {}  ({})", item.id, item.category, item.name, item.date_added);
            }
            println!("{} item(s)", items.len());
        }
        Command::Show { id, output } => {
            let items = store.get_all().await?;
            match items.iter().find(|item| item.id == id) {
                Some(item) => {
                    prepare::decode_data_uri(&item.image)?.save(&output)?;
                    println!("Saved '{}' to {}", item.name, output.display());
                }
                None => println!("No item with id {id}"),
            }
        }
        Command::Delete { id } => {
            store.delete(id).await?;
            println!("Deleted item {id}");
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE_NAME));
            let count = store.export_to_file(&path).await?;
            println!("Exported {count} item(s) to {}", path.display());
        }
        Command::Import { path } => {
            let count = store.import_from_file(&path).await?;
            println!("Closet imported successfully: {count} item(s)");
        }
        Command::Outfit {
            top,
            bottom,
            outerwear,
            shoes,
            accessories,
        } => {
            let wardrobe = store.wardrobe().await?;
            let mut outfit = Outfit::new();

            for (slot, pick) in [
                (Slot::Top, top),
                (Slot::Bottom, bottom),
                (Slot::Outerwear, outerwear),
                (Slot::Shoes, shoes),
            ] {
                let Some(id) = pick else { continue };
                let item = wardrobe.select(slot.category(), id).cloned();
                if item.is_none() {
                    warn!(id, category = slot.category(), "no such item in category");
                }
                outfit.set(slot, item);
            }
            for id in accessories {
                match wardrobe.select(category::ACCESSORY, id) {
                    Some(item) => outfit.add_accessory(item.clone()),
                    None => warn!(id, "no such accessory"),
                }
            }

            if outfit.is_empty() {
                println!("Nothing selected");
            }
            for item in outfit.items() {
                println!("{:<12} {} (#{})", item.category, item.name, item.id);
            }
        }
    }

    Ok(())
}
