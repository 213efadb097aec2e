//! GSLIB-style title line metadata.
//!
//! The first structural line of a grid text file is a free-form title.
//! By convention it may end with the grid dimensions the data belongs
//! to, which callers can use to reshape the single-column output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Two or three trailing integers separated by whitespace or `x`
static DIMENSION_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*[xX\s]\s*(\d+)(?:\s*[xX\s]\s*(\d+))?\s*\)?\s*$")
        .expect("dimension hint pattern is valid")
});

/// Grid extent embedded in a title line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridDimensions {
    /// Number of cells in the grid, or `None` if it does not fit in `usize`
    pub fn cell_count(&self) -> Option<usize> {
        self.nx.checked_mul(self.ny)?.checked_mul(self.nz)
    }
}

/// Title line of a grid text file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridHeader {
    /// The title line without its line terminator
    pub title: String,
    pub dimensions: Option<GridDimensions>,
}

impl GridHeader {
    pub fn parse(title: impl Into<String>) -> Self {
        let title = title.into();
        let dimensions = parse_dimensions(&title);

        if let Some(dims) = dimensions {
            debug!(
                "Title '{}' carries grid dimensions {}x{}x{}",
                title, dims.nx, dims.ny, dims.nz
            );
        }

        Self { title, dimensions }
    }
}

fn parse_dimensions(title: &str) -> Option<GridDimensions> {
    let captures = DIMENSION_HINT.captures(title)?;

    let nx = captures.get(1)?.as_str().parse::<usize>().ok()?;
    let ny = captures.get(2)?.as_str().parse::<usize>().ok()?;
    let nz = match captures.get(3) {
        Some(value) => value.as_str().parse::<usize>().ok()?,
        None => 1,
    };

    if nx == 0 || ny == 0 || nz == 0 {
        return None;
    }

    Some(GridDimensions { nx, ny, nz })
}
