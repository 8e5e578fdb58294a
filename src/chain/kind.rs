//! Step kinds and media types
//!
//! This module contains the generation step taxonomy:
//! - Text-to-image (prompt in, still image out)
//! - Image-to-video (image in, video clip out)
//! - Add-audio (video in, video with generated audio out)
//! - Upscale-video (video in, higher-resolution video out)

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// StepKind
// ============================================================================

/// The category of generation a step performs
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Generate a still image from a text prompt
    TextToImage,
    /// Animate an image into a video clip
    ImageToVideo,
    /// Generate and mix audio onto a video
    AddAudio,
    /// Upscale a video to a higher resolution
    UpscaleVideo,
    /// Any kind this build does not recognize. Chain files naming such a
    /// kind still parse; dispatching the step fails it at run time.
    Unknown,
}

impl<'de> Deserialize<'de> for StepKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(StepKind::from_tag(&tag))
    }
}

impl StepKind {
    /// Parse a serde tag ("text_to_image", "add_audio", ...). Anything
    /// unrecognized maps to [`StepKind::Unknown`] rather than an error.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text_to_image" => StepKind::TextToImage,
            "image_to_video" => StepKind::ImageToVideo,
            "add_audio" => StepKind::AddAudio,
            "upscale_video" => StepKind::UpscaleVideo,
            _ => StepKind::Unknown,
        }
    }

    /// The media type this kind produces on success
    pub fn output_type(&self) -> MediaType {
        match self {
            StepKind::TextToImage => MediaType::Image,
            StepKind::ImageToVideo | StepKind::AddAudio | StepKind::UpscaleVideo => {
                MediaType::Video
            }
            StepKind::Unknown => MediaType::Unknown,
        }
    }

    /// Model used when a step does not name one
    pub fn default_model(&self) -> &'static str {
        match self {
            StepKind::TextToImage => "flux_schnell",
            StepKind::ImageToVideo => "hailuo",
            StepKind::AddAudio => "thinksound",
            StepKind::UpscaleVideo => "topaz",
            StepKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            StepKind::TextToImage => "text_to_image",
            StepKind::ImageToVideo => "image_to_video",
            StepKind::AddAudio => "add_audio",
            StepKind::UpscaleVideo => "upscale_video",
            StepKind::Unknown => "unknown",
        };
        f.write_str(tag)
    }
}

// ============================================================================
// MediaType
// ============================================================================

/// The type of data flowing between steps
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Text,
    Image,
    Video,
    Unknown,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            MediaType::Text => "text",
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Unknown => "unknown",
        };
        f.write_str(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_type_mapping() {
        assert_eq!(StepKind::TextToImage.output_type(), MediaType::Image);
        assert_eq!(StepKind::ImageToVideo.output_type(), MediaType::Video);
        assert_eq!(StepKind::AddAudio.output_type(), MediaType::Video);
        assert_eq!(StepKind::UpscaleVideo.output_type(), MediaType::Video);
        assert_eq!(StepKind::Unknown.output_type(), MediaType::Unknown);
    }

    #[test]
    fn test_kind_deserialize_snake_case() {
        let kind: StepKind = serde_yaml::from_str("text_to_image").unwrap();
        assert_eq!(kind, StepKind::TextToImage);

        let kind: StepKind = serde_yaml::from_str("upscale_video").unwrap();
        assert_eq!(kind, StepKind::UpscaleVideo);
    }

    #[test]
    fn test_unrecognized_kind_parses_as_unknown() {
        let kind: StepKind = serde_yaml::from_str("face_swap").unwrap();
        assert_eq!(kind, StepKind::Unknown);
    }

    #[test]
    fn test_display_matches_serde_tag() {
        assert_eq!(StepKind::ImageToVideo.to_string(), "image_to_video");
        assert_eq!(MediaType::Image.to_string(), "image");
    }
}
