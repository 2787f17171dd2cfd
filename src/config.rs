use std::path::PathBuf;

use bon::Builder;

use crate::arc::{ArcParams, Point};
use crate::error::{PlotError, Result};

// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

/// Color representation for plot elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);
    pub const BLUE: Color = Color::new(0x00, 0x00, 0xff);
    pub const LIGHT_GRAY: Color = Color::new(0xbf, 0xbf, 0xbf);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from unit-range channels, clamping each to `0.0..=1.0`.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

// ============================================================================
// PLOT CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct PlotConfig {
    // Window configuration
    #[builder(default = "Dynamic Circular Coordinates".to_string(), into)]
    pub title: String,
    #[builder(default = 640)]
    pub window_size: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = true)]
    pub center_window: bool,
    #[builder(default = false)]
    pub log_adapter_info: bool,

    // Arc configuration, in the plot's y-up frame
    #[builder(default)]
    pub arc: ArcParams,

    // Outline configuration
    #[builder(default = 1.5)]
    pub line_thickness: f32,
    #[builder(default = 3)]
    pub center_dot_radius: i32,

    // Labels
    #[builder(default = vec!["4|0".into(), "1".into(), "2".into(), "3".into()])]
    pub quadrant_labels: Vec<String>,
    #[builder(default = "A_".to_string(), into)]
    pub point_label_prefix: String,
    #[builder(default = -75.0)]
    pub point_label_offset: f64,
    #[builder(default = 25.0)]
    pub title_top_margin: f64,

    // Font configuration
    pub font_path: Option<PathBuf>,
    #[builder(default = 32.0)]
    pub title_font_size: f32,
    #[builder(default = 24.0)]
    pub label_font_size: f32,

    // Colors
    #[builder(default = Color::LIGHT_GRAY)]
    pub background_color: Color,
    /// Cycled by segment index.
    #[builder(default = vec![Color::BLUE])]
    pub segment_colors: Vec<Color>,
    #[builder(default = Color::RED)]
    pub transition_color: Color,
    #[builder(default = Color::BLUE)]
    pub chord_color: Color,
    #[builder(default = Color::BLUE)]
    pub center_color: Color,
    #[builder(default = Color::BLACK)]
    pub title_color: Color,
    #[builder(default = Color::BLACK)]
    pub quadrant_label_color: Color,
    #[builder(default = Color::RED)]
    pub point_label_color: Color,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PlotConfig {
    pub fn segment_color(&self, segment: usize) -> Color {
        if self.segment_colors.is_empty() {
            return Color::BLUE;
        }
        self.segment_colors[segment % self.segment_colors.len()]
    }
}

// ============================================================================
// COMMAND LINE OPTIONS
// ============================================================================

pub const USAGE: &str = "\
usage: circular-coordinates [options]

  --weights A,B,..   segment weights (default 0.3,0.6,0.5,0.8)
  --total T          weight of the full circle (default 4)
  --samples N        circle samples (default 1000)
  --margin DEG       transition width in degrees (default 0.5)
  --radius R         circle radius in pixels (default 250)
  --font PATH        TrueType/OpenType font used for labels
  --title TEXT       window title
  --adapter-info     log graphics adapter details on startup
  --randomize        replace the weights with random values every second
  --no-center        leave window placement to the platform
  --help             print this message";

/// Options accepted by the `circular-coordinates` binary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub weights: Option<Vec<f64>>,
    pub total: Option<f64>,
    pub sample_count: Option<usize>,
    pub margin: Option<f64>,
    pub radius: Option<f64>,
    pub font_path: Option<PathBuf>,
    pub title: Option<String>,
    pub adapter_info: bool,
    pub randomize: bool,
    pub no_center: bool,
    pub help: bool,
}

fn value_for(option: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| PlotError::InvalidOption {
        option: option.to_string(),
        reason: "missing value".to_string(),
    })
}

fn parse_number<T: std::str::FromStr>(option: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| PlotError::InvalidOption {
        option: option.to_string(),
        reason: format!("`{value}` is not a number"),
    })
}

impl CliOptions {
    /// Parse arguments, not including the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--weights" => {
                    let value = value_for(&arg, args.next())?;
                    let weights = value
                        .split(',')
                        .map(|w| parse_number(&arg, w))
                        .collect::<Result<Vec<f64>>>()?;
                    options.weights = Some(weights);
                }
                "--total" => {
                    let value = value_for(&arg, args.next())?;
                    options.total = Some(parse_number(&arg, &value)?);
                }
                "--samples" => {
                    let value = value_for(&arg, args.next())?;
                    options.sample_count = Some(parse_number(&arg, &value)?);
                }
                "--margin" => {
                    let value = value_for(&arg, args.next())?;
                    options.margin = Some(parse_number(&arg, &value)?);
                }
                "--radius" => {
                    let value = value_for(&arg, args.next())?;
                    options.radius = Some(parse_number(&arg, &value)?);
                }
                "--font" => options.font_path = Some(PathBuf::from(value_for(&arg, args.next())?)),
                "--title" => options.title = Some(value_for(&arg, args.next())?),
                "--adapter-info" => options.adapter_info = true,
                "--randomize" => options.randomize = true,
                "--no-center" => options.no_center = true,
                "--help" | "-h" => options.help = true,
                _ => {
                    return Err(PlotError::InvalidOption {
                        option: arg.clone(),
                        reason: "unknown option".to_string(),
                    })
                }
            }
        }
        Ok(options)
    }

    /// Merge the options over the default configuration and validate the arc.
    pub fn into_config(self) -> Result<PlotConfig> {
        let window_size = PlotConfig::default().window_size;
        let half = window_size as f64 / 2.0;
        let arc = ArcParams::builder()
            .center(Point::new(half, half))
            .maybe_radius(self.radius)
            .maybe_sample_count(self.sample_count)
            .maybe_weights(self.weights)
            .maybe_total(self.total)
            .maybe_margin(self.margin)
            .build();
        arc.validate()?;

        Ok(PlotConfig::builder()
            .maybe_title(self.title)
            .window_size(window_size)
            .center_window(!self.no_center)
            .log_adapter_info(self.adapter_info)
            .arc(arc)
            .maybe_font_path(self.font_path)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_follow_plot_layout() {
        let config = PlotConfig::default();
        assert_eq!(config.window_size, 640);
        assert_eq!(config.title, "Dynamic Circular Coordinates");
        assert_eq!(config.background_color, Color::new(191, 191, 191));
        assert_eq!(config.quadrant_labels, vec!["4|0", "1", "2", "3"]);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn unit_colors_round_and_clamp() {
        assert_eq!(Color::from_unit(0.75, 0.75, 0.75), Color::LIGHT_GRAY);
        assert_eq!(Color::from_unit(-1.0, 2.0, 0.0), Color::new(0, 255, 0));
    }

    #[test]
    fn segment_colors_cycle() {
        let config = PlotConfig::builder()
            .segment_colors(vec![Color::RED, Color::BLUE])
            .build();
        assert_eq!(config.segment_color(0), Color::RED);
        assert_eq!(config.segment_color(3), Color::BLUE);

        let empty = PlotConfig::builder().segment_colors(vec![]).build();
        assert_eq!(empty.segment_color(2), Color::BLUE);
    }

    #[test]
    fn parses_all_options() {
        let options = CliOptions::parse(args(&[
            "--weights", "1,1, 2", "--total", "4", "--samples", "360", "--margin", "0",
            "--radius", "100", "--font", "FreeSans.ttf", "--title", "Demo", "--adapter-info",
            "--randomize", "--no-center",
        ]))
        .unwrap();
        assert_eq!(options.weights, Some(vec![1.0, 1.0, 2.0]));
        assert_eq!(options.total, Some(4.0));
        assert_eq!(options.sample_count, Some(360));
        assert_eq!(options.margin, Some(0.0));
        assert_eq!(options.radius, Some(100.0));
        assert_eq!(options.font_path, Some(PathBuf::from("FreeSans.ttf")));
        assert_eq!(options.title.as_deref(), Some("Demo"));
        assert!(options.adapter_info && options.randomize && options.no_center);

        let config = options.into_config().unwrap();
        assert_eq!(config.arc.weights, vec![1.0, 1.0, 2.0]);
        assert_eq!(config.arc.sample_count, 360);
        assert_eq!(config.arc.center, Point::new(320.0, 320.0));
        assert!(!config.center_window);
        assert!(config.log_adapter_info);
    }

    #[test]
    fn rejects_bad_options() {
        assert!(matches!(
            CliOptions::parse(args(&["--bogus"])),
            Err(PlotError::InvalidOption { .. })
        ));
        assert!(matches!(
            CliOptions::parse(args(&["--samples"])),
            Err(PlotError::InvalidOption { .. })
        ));
        assert!(matches!(
            CliOptions::parse(args(&["--weights", "1,x"])),
            Err(PlotError::InvalidOption { .. })
        ));
    }

    #[test]
    fn invalid_arc_options_fail_on_merge() {
        let options = CliOptions::parse(args(&["--samples", "0"])).unwrap();
        assert!(matches!(options.into_config(), Err(PlotError::Arc(_))));
    }
}
