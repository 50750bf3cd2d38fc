//! RGBA colors and CSS color parsing.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RGB`, `#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Color> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			return Self::parse_hex(hex);
		}

		let lower = s.to_ascii_lowercase();
		let args = lower
			.strip_prefix("rgba(")
			.or_else(|| lower.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let nums: Vec<&str> = args.split(',').map(str::trim).collect();
		if !(3..=4).contains(&nums.len()) {
			return None;
		}

		let channel = |s: &str| {
			s.parse::<f64>()
				.ok()
				.filter(|v| v.is_finite())
				.map(|v| v.clamp(0.0, 255.0).round() as u8)
		};
		let a = match nums.get(3) {
			Some(s) => s.parse::<f64>().ok().filter(|a| a.is_finite())?.clamp(0.0, 1.0),
			None => 1.0,
		};
		Some(Color::rgba(
			channel(nums[0])?,
			channel(nums[1])?,
			channel(nums[2])?,
			a,
		))
	}

	fn parse_hex(hex: &str) -> Option<Color> {
		if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
			return None;
		}
		match hex.len() {
			3 => {
				// #abc expands to #aabbcc
				let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
				Some(Color::rgb(digit(0)?, digit(1)?, digit(2)?))
			}
			6 => {
				let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
				Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?))
			}
			_ => None,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}
