//! The `pack` subcommand.
use std::fs;
use std::io::{self, Read};

use anyhow::{anyhow, Context, Error};
use clap::{App, ArgMatches, SubCommand};
use serde::Deserialize;

use veritab_pack::{binary_search_pack, Rect};

/// Layout parameters for the `pack` subcommand.
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Container height divided by container width. (Default: sqrt 2, the
    /// portrait paper ratio)
    pub ratio: f64,
    /// Search the container height instead of the width.
    pub vertical: bool,
}

impl Default for PackConfig {
    fn default() -> PackConfig {
        PackConfig {
            ratio: std::f64::consts::SQRT_2,
            vertical: false,
        }
    }
}

pub fn pack_args() -> App<'static, 'static> {
    SubCommand::with_name("pack")
        .about("Pack rectangles into the smallest container of a fixed aspect ratio")
        .arg_from_usage("[INPUT] 'File with one WIDTHxHEIGHT rectangle per line (stdin if omitted)'")
        .arg_from_usage("[config-file] --config=[FILE] 'Read layout parameters from a TOML file'")
        .arg_from_usage("[ratio] --ratio=[RATIO] 'Container height divided by container width'")
        .arg_from_usage("--vertical 'Search the container height instead of the width'")
}

pub fn pack_main(matches: &ArgMatches) -> Result<i32, Error> {
    let mut config = PackConfig::default();

    if let Some(path) = matches.value_of("config-file") {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read config file '{}'", path))?;
        config = toml::from_str(&contents)?;
    }

    if let Some(ratio) = matches.value_of("ratio") {
        config.ratio = ratio
            .parse()
            .with_context(|| format!("invalid ratio '{}'", ratio))?;
    }

    if matches.is_present("vertical") {
        config.vertical = true;
    }

    let input = match matches.value_of("INPUT") {
        Some(path) => {
            log::info!("Reading file '{}'", path);
            fs::read_to_string(path)?
        }
        None => {
            log::info!("Reading from stdin");
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let mut rects = parse_rects(&input)?;
    if rects.is_empty() {
        return Err(anyhow!("input contains no rectangles"));
    }

    let stats = binary_search_pack(&mut rects, config.ratio, config.vertical);

    // Rectangles come back in placement order, largest area first.
    for rect in rects.iter() {
        if rect.packed {
            println!("{}x{} at {}, {}", rect.width, rect.height, rect.x, rect.y);
        } else {
            println!("{}x{} not packed", rect.width, rect.height);
        }
    }

    log::info!("Packed size: {}x{}", stats.width, stats.height);
    log::info!("Packing ratio: {:.1}%", stats.efficiency * 100.0);

    Ok(0)
}

fn parse_rects(input: &str) -> Result<Vec<Rect>, Error> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut parts = line.splitn(2, 'x');
            let width = parts.next().unwrap_or("").trim();
            let height = parts.next().unwrap_or("").trim();

            let width: f64 = width
                .parse()
                .with_context(|| format!("invalid rectangle '{}'", line))?;
            let height: f64 = height
                .parse()
                .with_context(|| format!("invalid rectangle '{}'", line))?;

            if width <= 0.0 || height <= 0.0 {
                return Err(anyhow!("rectangle '{}' has a non-positive side", line));
            }

            Ok(Rect::new(width, height))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rect_lines() {
        let rects = parse_rects("100x50\n\n  30 x 40  \n").unwrap();

        assert_eq!(rects.len(), 2);
        assert_eq!((rects[0].width, rects[0].height), (100.0, 50.0));
        assert_eq!((rects[1].width, rects[1].height), (30.0, 40.0));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_rects("100").is_err());
        assert!(parse_rects("ax5").is_err());
        assert!(parse_rects("0x5").is_err());
    }
}
