//! Problem parameters and solver options
//!
//! Parameters come either from the plain text format
//!
//! ```text
//! width height h
//! tc th
//! ```
//!
//! or from a JSON [`HeatConfig`] (selected by a `.json` file extension).

use crate::error::{HeatError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest number of unknowns a grid may have
pub const MAX_UNKNOWNS: usize = 1 << 26;

/// Physical description of the strip: size, grid spacing and boundary temperatures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatParameters {
    /// Domain extent along x (periodic direction)
    pub width: f64,
    /// Domain extent along y (between the two Dirichlet edges)
    pub height: f64,
    /// Grid spacing
    pub h: f64,
    /// Cold temperature scaling the lower boundary profile
    pub tc: f64,
    /// Hot temperature imposed on the upper boundary
    pub th: f64,
}

impl HeatParameters {
    /// Parse the whitespace-delimited text format and validate the result
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let mut next = |field: &'static str| -> Result<f64> {
            let token = tokens.next().ok_or(HeatError::MissingField { field })?;
            token.parse::<f64>().map_err(|_| HeatError::InvalidNumber {
                field,
                value: token.to_string(),
            })
        };

        let params = Self {
            width: next("width")?,
            height: next("height")?,
            h: next("h")?,
            tc: next("tc")?,
            th: next("th")?,
        };

        if let Some(token) = tokens.next() {
            return Err(HeatError::TrailingInput {
                token: token.to_string(),
            });
        }

        params.validate()?;
        Ok(params)
    }

    /// Check that the grid is well defined
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("h", self.h),
            ("tc", self.tc),
            ("th", self.th),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(HeatError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        if self.h <= 0.0 {
            return Err(HeatError::InvalidParameter {
                name: "h",
                value: self.h,
                reason: "must be > 0",
            });
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(value / self.h).is_finite() {
                return Err(HeatError::InvalidParameter {
                    name,
                    value,
                    reason: "too many grid spacings for h",
                });
            }
        }
        if self.width / self.h < 1.0 {
            return Err(HeatError::InvalidParameter {
                name: "width",
                value: self.width,
                reason: "must span at least one grid spacing",
            });
        }
        if self.height / self.h < 2.0 {
            return Err(HeatError::InvalidParameter {
                name: "height",
                value: self.height,
                reason: "must span at least two grid spacings",
            });
        }
        self.num_unknowns()?;
        Ok(())
    }

    /// Number of unknowns `m * n`, rejecting grids above [`MAX_UNKNOWNS`]
    pub fn num_unknowns(&self) -> Result<usize> {
        self.stencils_x()
            .checked_mul(self.stencils_y())
            .filter(|&count| count <= MAX_UNKNOWNS)
            .ok_or(HeatError::InvalidParameter {
                name: "h",
                value: self.h,
                reason: "grid has too many unknowns",
            })
    }

    /// Number of unknowns along x: floor(width / h)
    pub fn stencils_x(&self) -> usize {
        (self.width / self.h).floor() as usize
    }

    /// Number of unknowns along y: floor(height / h) - 1
    ///
    /// The two Dirichlet rows are not unknowns.
    pub fn stencils_y(&self) -> usize {
        ((self.height / self.h).floor() as usize).saturating_sub(1)
    }
}

/// Options for the CG solve of an assembled problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Relative residual tolerance
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap (`None` = number of unknowns)
    #[serde(default)]
    pub max_iterations: Option<usize>,
    /// Prefix of snapshot files; no snapshots are written when absent
    #[serde(default)]
    pub snapshot_prefix: Option<PathBuf>,
    /// Iterations between snapshots
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: None,
            snapshot_prefix: None,
            snapshot_interval: default_snapshot_interval(),
        }
    }
}

fn default_tolerance() -> f64 {
    1e-5
}

fn default_snapshot_interval() -> usize {
    10
}

/// Complete run description loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatConfig {
    /// Physical parameters
    pub parameters: HeatParameters,
    /// Solver options
    #[serde(default)]
    pub solver: SolveOptions,
}

impl HeatConfig {
    /// Load from a file, choosing JSON or the text format by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| HeatError::io(path, e))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&contents)
        } else {
            Ok(Self {
                parameters: HeatParameters::parse(&contents)?,
                solver: SolveOptions::default(),
            })
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: HeatConfig = serde_json::from_str(contents)?;
        config.parameters.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| HeatError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_text_format() {
        let p = HeatParameters::parse("1.0 0.5 0.1\n-5.0 30.0\n").unwrap();
        assert_relative_eq!(p.width, 1.0);
        assert_relative_eq!(p.height, 0.5);
        assert_relative_eq!(p.h, 0.1);
        assert_relative_eq!(p.tc, -5.0);
        assert_relative_eq!(p.th, 30.0);
        assert_eq!(p.stencils_x(), 10);
        assert_eq!(p.stencils_y(), 4);
    }

    #[test]
    fn test_parse_missing_field() {
        let err = HeatParameters::parse("1.0 1.0 0.5\n1.0\n").unwrap_err();
        assert!(matches!(err, HeatError::MissingField { field: "th" }));
    }

    #[test]
    fn test_parse_non_numeric() {
        let err = HeatParameters::parse("1.0 one 0.5\n1.0 0.0\n").unwrap_err();
        match err {
            HeatError::InvalidNumber { field, value } => {
                assert_eq!(field, "height");
                assert_eq!(value, "one");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_trailing_input() {
        let err = HeatParameters::parse("1 1 0.5\n1 0\n7\n").unwrap_err();
        assert!(matches!(err, HeatError::TrailingInput { .. }));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(HeatParameters::parse("1 1 0\n1 0").unwrap_err().is_input_error());
        assert!(HeatParameters::parse("1 1 -0.5\n1 0").is_err());
        // width smaller than one cell
        assert!(HeatParameters::parse("0.4 1 0.5\n1 0").is_err());
        // no interior row
        assert!(HeatParameters::parse("1 0.5 0.5\n1 0").is_err());
        assert!(HeatParameters::parse("1 1 0.5\ninf 0").is_err());
    }

    #[test]
    fn test_validate_rejects_unbounded_grid() {
        // width / h overflows to infinity
        let err = HeatParameters::parse("1.0 1.0 1e-320\n1.0 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            HeatError::InvalidParameter { name: "width", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        // m * n overflows usize
        let huge = HeatParameters {
            width: 1e10,
            height: 1e10,
            h: 0.1,
            tc: 1.0,
            th: 0.0,
        };
        assert!(matches!(
            huge.validate().unwrap_err(),
            HeatError::InvalidParameter { name: "h", .. }
        ));

        // fits in usize but exceeds the cap
        let large = HeatParameters {
            width: 1e4,
            height: 1e4,
            ..huge
        };
        assert!(large.num_unknowns().unwrap_err().is_input_error());

        let small = HeatParameters {
            width: 1.0,
            height: 0.5,
            ..huge
        };
        assert_eq!(small.num_unknowns().unwrap(), 40);
    }

    #[test]
    fn test_json_config_defaults() {
        let json = r#"{"parameters": {"width": 1.0, "height": 1.0, "h": 0.5, "tc": 1.0, "th": 0.0}}"#;
        let config = HeatConfig::from_json(json).unwrap();
        assert_eq!(config.solver, SolveOptions::default());
        assert_relative_eq!(config.solver.tolerance, 1e-5);
        assert_eq!(config.solver.snapshot_interval, 10);
        assert_eq!(config.parameters.stencils_x(), 2);
        assert_eq!(config.parameters.stencils_y(), 1);
    }

    #[test]
    fn test_json_config_rejects_invalid_parameters() {
        let json = r#"{"parameters": {"width": 1.0, "height": 1.0, "h": 0.0, "tc": 1.0, "th": 0.0}}"#;
        assert!(HeatConfig::from_json(json).unwrap_err().is_input_error());
        assert!(matches!(
            HeatConfig::from_json("{").unwrap_err(),
            HeatError::Json(_)
        ));
    }
}
