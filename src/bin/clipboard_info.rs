//! Inspect a copied-tiles clipboard document.
//!
//! Usage: cargo run --bin clipboard_info -- --file copied.json [--anchor-x 10 --anchor-y 20]

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use gndedit::clipboard::{decode, PendingCube};
use gndedit::core::logging;
use gndedit::core::types::IVec2;
use gndedit::ground::Face;
use log::{error, info};

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = parse_str_arg(&args, "--file").or_else(|| positional_arg(&args)) else {
        error!("Usage: clipboard_info --file <clipboard.json> [--anchor-x X --anchor-y Y]");
        return ExitCode::FAILURE;
    };
    let anchor = IVec2::new(
        parse_i32_arg(&args, "--anchor-x").unwrap_or(0),
        parse_i32_arg(&args, "--anchor-y").unwrap_or(0),
    );

    let path = PathBuf::from(path);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let cubes = match decode(&text) {
        Ok(cubes) => cubes,
        Err(e) => {
            error!("Rejected {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    summarize(&cubes, anchor);
    ExitCode::SUCCESS
}

fn summarize(cubes: &[PendingCube], anchor: IVec2) {
    info!("{} cubes", cubes.len());
    if cubes.is_empty() {
        return;
    }

    let positions: Vec<IVec2> = cubes.iter().map(|c| c.absolute_position(anchor)).collect();
    let min = positions.iter().fold(positions[0], |acc, p| acc.min(*p));
    let max = positions.iter().fold(positions[0], |acc, p| acc.max(*p));
    info!("Tiles ({}, {}) to ({}, {}) at anchor ({}, {})", min.x, min.y, max.x, max.y, anchor.x, anchor.y);

    let heights = cubes.iter().flat_map(|c| c.heights);
    let (low, high) = heights.fold((f32::MAX, f32::MIN), |(lo, hi), h| (lo.min(h), hi.max(h)));
    info!("Heights {:.2} to {:.2}", low, high);

    for face in Face::ALL {
        let count = cubes.iter().filter(|c| c.face(face).is_some()).count();
        info!("{:?} faces: {}", face, count);
    }

    let textures: BTreeSet<&str> = cubes
        .iter()
        .flat_map(|c| c.faces.iter().flatten())
        .filter_map(|f| f.texture.as_ref())
        .map(|t| t.file.as_str())
        .collect();
    for file in &textures {
        info!("Texture {}", file);
    }
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// First argument that is neither a flag nor a flag's value
fn positional_arg(args: &[String]) -> Option<String> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg.starts_with("--") {
            rest.next();
        } else {
            return Some(arg.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_file_after_flags() {
        let a = args(&["clipboard_info", "--anchor-x", "4", "--anchor-y", "-2", "copied.json"]);
        assert_eq!(positional_arg(&a).as_deref(), Some("copied.json"));
        assert_eq!(parse_i32_arg(&a, "--anchor-y"), Some(-2));
    }

    #[test]
    fn test_file_flag_and_missing_file() {
        let a = args(&["clipboard_info", "--anchor-x", "4", "--file", "c.json"]);
        assert_eq!(parse_str_arg(&a, "--file").as_deref(), Some("c.json"));
        assert_eq!(positional_arg(&args(&["clipboard_info", "--anchor-x", "4"])), None);
    }
}
