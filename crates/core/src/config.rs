use std::env;

use serde::{Deserialize, Serialize};

use crate::error::AnyRpgError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled value: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt<F>(lookup: &F, profile: &str, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed) {
            return Some(v);
        }
    }
    lookup(key)
}

fn profiled_usize<F>(lookup: &F, profile: &str, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match profiled_opt(lookup, profile, key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, default, "ignoring unparsable config value");
                default
            }
        },
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub segmenter: SegmenterConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ANYRPG_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("ANYRPG_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        Self::from_lookup(profile, env_opt)
    }

    /// Build config from an arbitrary key lookup instead of the process environment.
    pub fn from_lookup<F>(profile: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let p = profile.to_uppercase();
        Self {
            segmenter: SegmenterConfig::from_lookup(&p, &lookup),
            profile: p,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        let s = &self.segmenter;
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  segmenter:   chapters={}..{}, pages_per_chapter={}",
            s.min_chapters,
            s.max_chapters,
            s.pages_per_chapter
        );
        tracing::info!(
            "  thresholds:  min_chapter={}, thin_chapter={}, min_split={}",
            s.min_chapter_chars,
            s.thin_chapter_chars,
            s.min_split_chars
        );
        tracing::info!(
            "  caps:        chapter={}, fallback={}",
            s.max_chapter_chars,
            s.fallback_chars
        );
    }

    /// Return a JSON view of the resolved config.
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "segmenter": self.segmenter,
        })
    }
}

// ── Segmenter ─────────────────────────────────────────────────

/// Thresholds for chapter segmentation. All sizes are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Floor on the number of chapters produced for non-trivial text.
    pub min_chapters: usize,
    /// Ceiling on the fallback splitter's target count.
    pub max_chapters: usize,
    /// Pages per chapter when sizing the fallback split.
    pub pages_per_chapter: usize,
    /// Chapters shorter than this are dropped.
    pub min_chapter_chars: usize,
    /// If every detected chapter is shorter than this, detection is discarded.
    pub thin_chapter_chars: usize,
    /// Chapters shorter than this are never force-split.
    pub min_split_chars: usize,
    /// Per-chapter content cap.
    pub max_chapter_chars: usize,
    /// Excerpt size for the single synthetic chapter.
    pub fallback_chars: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_chapters: 4,
            max_chapters: 20,
            pages_per_chapter: 10,
            min_chapter_chars: 100,
            thin_chapter_chars: 300,
            min_split_chars: 200,
            max_chapter_chars: 20_000,
            fallback_chars: 50_000,
        }
    }
}

impl SegmenterConfig {
    /// Read `SEGMENT_*` keys for the given profile, keeping defaults for
    /// missing keys. An inconsistent result falls back to the defaults.
    fn from_lookup<F>(p: &str, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let cfg = Self {
            min_chapters: profiled_usize(lookup, p, "SEGMENT_MIN_CHAPTERS", d.min_chapters),
            max_chapters: profiled_usize(lookup, p, "SEGMENT_MAX_CHAPTERS", d.max_chapters),
            pages_per_chapter: profiled_usize(
                lookup,
                p,
                "SEGMENT_PAGES_PER_CHAPTER",
                d.pages_per_chapter,
            ),
            min_chapter_chars: profiled_usize(
                lookup,
                p,
                "SEGMENT_MIN_CHAPTER_CHARS",
                d.min_chapter_chars,
            ),
            thin_chapter_chars: profiled_usize(
                lookup,
                p,
                "SEGMENT_THIN_CHAPTER_CHARS",
                d.thin_chapter_chars,
            ),
            min_split_chars: profiled_usize(
                lookup,
                p,
                "SEGMENT_MIN_SPLIT_CHARS",
                d.min_split_chars,
            ),
            max_chapter_chars: profiled_usize(
                lookup,
                p,
                "SEGMENT_MAX_CHAPTER_CHARS",
                d.max_chapter_chars,
            ),
            fallback_chars: profiled_usize(lookup, p, "SEGMENT_FALLBACK_CHARS", d.fallback_chars),
        };
        match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "segmenter config rejected, using defaults");
                d
            }
        }
    }

    /// Check the relationships between thresholds.
    pub fn validate(&self) -> Result<(), AnyRpgError> {
        if self.min_chapters == 0 {
            return Err(invalid("SEGMENT_MIN_CHAPTERS", self.min_chapters));
        }
        if self.max_chapters < self.min_chapters {
            return Err(invalid("SEGMENT_MAX_CHAPTERS", self.max_chapters));
        }
        if self.pages_per_chapter == 0 {
            return Err(invalid("SEGMENT_PAGES_PER_CHAPTER", self.pages_per_chapter));
        }
        if self.max_chapter_chars == 0 {
            return Err(invalid("SEGMENT_MAX_CHAPTER_CHARS", self.max_chapter_chars));
        }
        Ok(())
    }

    /// Target chapter count for the fallback splitter:
    /// `ceil(num_pages / pages_per_chapter)` clamped to `[min_chapters, max_chapters]`.
    pub fn target_chapters(&self, num_pages: u32) -> usize {
        let per = self.pages_per_chapter.max(1);
        (num_pages as usize)
            .div_ceil(per)
            .clamp(self.min_chapters, self.max_chapters.max(self.min_chapters))
    }
}

fn invalid(key: &str, value: usize) -> AnyRpgError {
    AnyRpgError::Config {
        key: key.to_string(),
        value: value.to_string(),
    }
}
