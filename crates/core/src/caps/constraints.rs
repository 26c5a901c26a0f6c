//! Constraint types for capability descriptions
//!
//! A capability is not a single concrete format but a constrained set of
//! formats. Constraints support exact values, inclusive ranges and discrete
//! sets; an omitted constraint (`None`) accepts any value.

use serde::{Deserialize, Serialize};

/// Generic constraint expression supporting exact values, ranges or sets.
///
/// # JSON representations
///
/// - **Exact**: `48000` (single value)
/// - **Range**: `{"min": 16000, "max": 48000}` (inclusive)
/// - **Set**: `[16000, 44100, 48000]` (discrete values)
///
/// # Example
///
/// ```rust
/// use autoconvert_core::caps::ConstraintValue;
///
/// let range = ConstraintValue::Range { min: 16000u32, max: 48000 };
/// assert!(range.satisfies(&32000));
/// assert!(!range.satisfies(&8000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue<T> {
    /// Single exact value required
    Exact(T),
    /// Inclusive range of acceptable values
    Range {
        /// Minimum value (inclusive)
        min: T,
        /// Maximum value (inclusive)
        max: T,
    },
    /// List of discrete acceptable values
    Set(Vec<T>),
}

impl<T: PartialOrd + PartialEq> ConstraintValue<T> {
    /// Check if a value satisfies this constraint.
    pub fn satisfies(&self, value: &T) -> bool {
        match self {
            ConstraintValue::Exact(exact) => value == exact,
            ConstraintValue::Range { min, max } => value >= min && value <= max,
            ConstraintValue::Set(set) => set.iter().any(|v| v == value),
        }
    }

    /// Check if two constraints overlap: at least one value satisfies both.
    pub fn compatible_with(&self, other: &ConstraintValue<T>) -> bool {
        match (self, other) {
            // Exact vs Exact: must be equal
            (ConstraintValue::Exact(a), ConstraintValue::Exact(b)) => a == b,

            // Exact vs Range: exact must be in range
            (ConstraintValue::Exact(a), ConstraintValue::Range { min, max })
            | (ConstraintValue::Range { min, max }, ConstraintValue::Exact(a)) => {
                a >= min && a <= max
            }

            // Exact vs Set: exact must be in set
            (ConstraintValue::Exact(a), ConstraintValue::Set(set))
            | (ConstraintValue::Set(set), ConstraintValue::Exact(a)) => set.contains(a),

            // Range vs Range: ranges must overlap
            (
                ConstraintValue::Range {
                    min: min1,
                    max: max1,
                },
                ConstraintValue::Range {
                    min: min2,
                    max: max2,
                },
            ) => min1 <= max2 && min2 <= max1,

            // Range vs Set: at least one set element must be in range
            (ConstraintValue::Range { min, max }, ConstraintValue::Set(set))
            | (ConstraintValue::Set(set), ConstraintValue::Range { min, max }) => {
                set.iter().any(|v| v >= min && v <= max)
            }

            // Set vs Set: must share an element
            (ConstraintValue::Set(set1), ConstraintValue::Set(set2)) => {
                set1.iter().any(|v| set2.contains(v))
            }
        }
    }
}

/// Audio sample format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AudioSampleFormat {
    /// 32-bit floating point [-1.0, 1.0]
    F32,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 8-bit unsigned integer
    U8,
}

/// Video pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum PixelFormat {
    /// 24-bit RGB (8 bits per channel, packed)
    RGB24,
    /// 32-bit RGBA (8 bits per channel, packed)
    RGBA,
    /// 24-bit BGR (8 bits per channel, packed)
    BGR24,
    /// YUV 4:2:0 planar
    YUV420,
    /// YUV 4:2:2 planar
    YUV422,
    /// NV12 (Y plane + interleaved UV)
    NV12,
}

/// Audio format constraints. Each field is optional; `None` accepts any
/// value for that property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioConstraints {
    /// Sample rate constraint in Hz. `None` = any sample rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<ConstraintValue<u32>>,

    /// Channel count constraint. `None` = any channel count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<ConstraintValue<u32>>,

    /// Sample format constraint. `None` = any format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ConstraintValue<AudioSampleFormat>>,
}

/// Video format constraints. Each field is optional; `None` accepts any
/// value for that property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoConstraints {
    /// Frame width constraint in pixels. `None` = any width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ConstraintValue<u32>>,

    /// Frame height constraint in pixels. `None` = any height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<ConstraintValue<u32>>,

    /// Framerate constraint in frames per second. `None` = any framerate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framerate: Option<ConstraintValue<f32>>,

    /// Pixel format constraint. `None` = any format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_format: Option<ConstraintValue<PixelFormat>>,
}

/// One structural format description inside a capability set.
///
/// Two specs can intersect only when they describe the same media type and
/// every constrained property pair overlaps. An absent property constraint
/// matches anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormatSpec {
    /// Audio format description
    Audio(AudioConstraints),
    /// Video format description
    Video(VideoConstraints),
    /// Opaque binary data (no further constraints)
    Binary,
}

/// Overlap test for a pair of optional property constraints. An absent
/// constraint accepts any value, so only two present constraints can fail.
fn fields_overlap<T: PartialOrd + PartialEq>(
    a: &Option<ConstraintValue<T>>,
    b: &Option<ConstraintValue<T>>,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.compatible_with(b),
        _ => true,
    }
}

impl FormatSpec {
    /// The media type name of this spec.
    pub fn media_type(&self) -> &'static str {
        match self {
            FormatSpec::Audio(_) => "audio",
            FormatSpec::Video(_) => "video",
            FormatSpec::Binary => "binary",
        }
    }

    /// Check whether a non-empty overlap exists between two specs.
    pub fn can_intersect(&self, other: &FormatSpec) -> bool {
        match (self, other) {
            (FormatSpec::Audio(a), FormatSpec::Audio(b)) => {
                fields_overlap(&a.sample_rate, &b.sample_rate)
                    && fields_overlap(&a.channels, &b.channels)
                    && fields_overlap(&a.format, &b.format)
            }
            (FormatSpec::Video(a), FormatSpec::Video(b)) => {
                fields_overlap(&a.width, &b.width)
                    && fields_overlap(&a.height, &b.height)
                    && fields_overlap(&a.framerate, &b.framerate)
                    && fields_overlap(&a.pixel_format, &b.pixel_format)
            }
            (FormatSpec::Binary, FormatSpec::Binary) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_value_satisfies() {
        let exact = ConstraintValue::Exact(48000u32);
        assert!(exact.satisfies(&48000));
        assert!(!exact.satisfies(&16000));

        let range = ConstraintValue::Range {
            min: 16000u32,
            max: 48000,
        };
        assert!(range.satisfies(&16000));
        assert!(range.satisfies(&48000));
        assert!(!range.satisfies(&96000));

        let set = ConstraintValue::Set(vec![16000u32, 44100, 48000]);
        assert!(set.satisfies(&44100));
        assert!(!set.satisfies(&22050));
    }

    #[test]
    fn test_constraint_value_compatible_exact_range() {
        let exact = ConstraintValue::Exact(32000u32);
        let range = ConstraintValue::Range {
            min: 16000,
            max: 48000,
        };
        let out_of_range = ConstraintValue::Exact(8000u32);

        assert!(exact.compatible_with(&range));
        assert!(range.compatible_with(&exact));
        assert!(!out_of_range.compatible_with(&range));
    }

    #[test]
    fn test_constraint_value_compatible_range_range() {
        let r1 = ConstraintValue::Range {
            min: 16000u32,
            max: 48000,
        };
        let r2 = ConstraintValue::Range {
            min: 32000,
            max: 96000,
        };
        let r3 = ConstraintValue::Range {
            min: 64000,
            max: 96000,
        };

        assert!(r1.compatible_with(&r2));
        assert!(!r1.compatible_with(&r3));
    }

    #[test]
    fn test_constraint_value_compatible_set_set() {
        let s1 = ConstraintValue::Set(vec![1u32, 2, 3]);
        let s2 = ConstraintValue::Set(vec![3u32, 4]);
        let s3 = ConstraintValue::Set(vec![5u32]);

        assert!(s1.compatible_with(&s2));
        assert!(!s1.compatible_with(&s3));
    }

    #[test]
    fn test_format_spec_intersect_same_media() {
        let narrow = FormatSpec::Audio(AudioConstraints {
            sample_rate: Some(ConstraintValue::Exact(16000)),
            channels: None,
            format: None,
        });
        let wide = FormatSpec::Audio(AudioConstraints {
            sample_rate: Some(ConstraintValue::Range {
                min: 8000,
                max: 48000,
            }),
            channels: Some(ConstraintValue::Exact(1)),
            format: None,
        });

        assert!(narrow.can_intersect(&wide));
        assert!(wide.can_intersect(&narrow));
    }

    #[test]
    fn test_format_spec_intersect_disjoint_property() {
        let a = FormatSpec::Video(VideoConstraints {
            width: Some(ConstraintValue::Exact(640)),
            ..Default::default()
        });
        let b = FormatSpec::Video(VideoConstraints {
            width: Some(ConstraintValue::Exact(1920)),
            ..Default::default()
        });
        assert!(!a.can_intersect(&b));
    }

    #[test]
    fn test_format_spec_intersect_cross_media() {
        let audio = FormatSpec::Audio(AudioConstraints::default());
        let video = FormatSpec::Video(VideoConstraints::default());
        assert!(!audio.can_intersect(&video));
        assert!(audio.can_intersect(&FormatSpec::Audio(AudioConstraints::default())));
        assert!(FormatSpec::Binary.can_intersect(&FormatSpec::Binary));
    }

    #[test]
    fn test_format_spec_json_tagged() {
        let spec = FormatSpec::Audio(AudioConstraints {
            sample_rate: Some(ConstraintValue::Exact(16000)),
            channels: Some(ConstraintValue::Exact(1)),
            format: None,
        });

        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"type\":\"audio\""));

        let parsed: FormatSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }
}
