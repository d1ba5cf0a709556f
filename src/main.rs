//! Infographic CLI
//!
//! Usage:
//!   infographic [OPTIONS] [FILE]
//!
//! Options:
//!   -p, --palette <FILE>  Palette file overriding the document's palette (TOML format)
//!   -b, --background <COLOR>  Canvas background color
//!   -d, --debug           Log at debug level and print the layout tree
//!   --list-items          List registered items
//!   --list-palettes       List registered palettes
//!   --list-fonts          List registered fonts
//!   -h, --help            Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use infographic::fonts::{default_font, get_fonts};
use infographic::items::get_items;
use infographic::theme::{palette_names, PaletteFile};
use infographic::{render_with_config, Infographic, RenderConfig, SvgConfig};

#[derive(Parser)]
#[command(name = "infographic")]
#[command(about = "Render data-driven infographics to SVG")]
struct Cli {
    /// Input document (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Palette file overriding the document's palette (TOML format)
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// Canvas background color
    #[arg(short, long)]
    background: Option<String>,

    /// Debug mode: debug logging and a dump of the laid-out tree
    #[arg(short, long)]
    debug: bool,

    /// List registered items and the data slots they display
    #[arg(long)]
    list_items: bool,

    /// List registered palettes
    #[arg(long)]
    list_palettes: bool,

    /// List registered fonts
    #[arg(long)]
    list_fonts: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Handle catalog listings first
    if cli.list_items {
        for (name, item) in get_items() {
            let slots: Vec<_> = item.composites.iter().map(|c| c.as_str()).collect();
            println!("{} [{}]", name, slots.join(", "));
        }
        return;
    }

    if cli.list_palettes {
        for name in palette_names() {
            println!("{}", name);
        }
        return;
    }

    if cli.list_fonts {
        let default = default_font();
        for font in get_fonts() {
            let marker = if font.name == default { " (default)" } else { "" };
            println!("{}{}", font.name, marker);
        }
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load palette override
    let palette = match &cli.palette {
        Some(path) => match PaletteFile::from_file(path) {
            Ok(file) if !file.colors.is_empty() => Some(file.colors),
            Ok(_) => {
                eprintln!("Palette '{}' has no colors", path.display());
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Error loading palette '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let doc = match Infographic::from_str(&source) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut config = RenderConfig::new().with_debug(cli.debug);
    if let Some(background) = cli.background {
        config = config.with_svg(SvgConfig::new().with_background(background));
    }
    if let Some(palette) = palette {
        config = config.with_palette(palette);
    }
    match render_with_config(&doc, config) {
        Ok(svg) => {
            println!("{}", svg);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Infographic - render data-driven infographics to SVG

USAGE:
    infographic [OPTIONS] [FILE]
    cat doc.toml | infographic

OPTIONS:
    -p, --palette      Custom palette (TOML file)
    -b, --background   Canvas background color
    -d, --debug        Debug logging and layout tree dump
    --list-items       List registered items
    --list-palettes    List registered palettes
    --list-fonts       List registered fonts
    -h, --help         Print help

QUICK START:
    cat > steps.toml <<EOF
    [design]
    item = "simple-vertical-arrow"
    direction = "column"

    [[data]]
    label = "Plan"
    desc = "Decide what to build"
    EOF
    infographic steps.toml > steps.svg"#
    );
}
