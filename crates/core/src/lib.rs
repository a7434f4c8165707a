//! defscan: heuristic multi-language definition scanner.
//!
//! Finds functions, methods, classes, structs, enums, traits, interfaces,
//! impls and modules in source text without a grammar. Comments and literals
//! are masked first so look-alikes inside them never match, and any input
//! (empty, binary, truncated or not UTF-8) produces a [`ScanResult`].
//!
//! # Modules
//!
//! - [`classify`]: picks a source profile from override, extension, shebang or content
//! - [`scrub`]: masks comments and string/char literals
//! - [`matcher`]: finds definition heads and resolves multi-line signatures
//! - [`blocks`]: resolves body spans (braces, indentation, statements)
//! - [`aggregate`]: builds ordered records with parent links
//! - [`metadata`]: parameters, decorators and doc text
//! - [`diagnostics`]: non-fatal issue collection
//! - [`profile`]: per-language lexical rules and pattern tables
//! - [`config`]: caller tunables and `.defscan.toml` parsing
//! - [`types`]: public records and outline queries

pub mod aggregate;
pub mod blocks;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod matcher;
pub mod metadata;
pub mod profile;
pub mod scrub;
pub mod span;
pub mod types;

use tracing::debug;

pub use blocks::{Balance, DelimiterCount};
pub use classify::Classification;
pub use config::{ProfileTunables, ScanOptions};
pub use error::{ConfigError, ScanError};
pub use profile::{ProfileId, ProfileSet};
pub use span::Span;
pub use types::{
    ClassifiedBy, DefinitionKind, DefinitionRecord, Diagnostic, DiagnosticKind, ScanResult, Severity,
};

use diagnostics::Diagnostics;
use span::LineIndex;

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// A configured scanner. Holds no per-file state, so one instance can scan
/// any number of files from any number of threads.
#[derive(Debug, Clone)]
pub struct Scanner {
    options: ScanOptions,
    profiles: &'static ProfileSet,
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::new(ScanOptions::default())
    }
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Scanner { options, profiles: ProfileSet::builtin() }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn classify(
        &self,
        filename: &str,
        bytes: &[u8],
        profile_override: Option<ProfileId>,
    ) -> Classification {
        classify::classify(filename, bytes, profile_override, &self.options.extensions)
    }

    pub fn scan(
        &self,
        text: &str,
        filename: &str,
        profile_override: Option<ProfileId>,
    ) -> Result<ScanResult, ScanError> {
        self.scan_bytes(text.as_bytes(), filename, profile_override)
    }

    /// Scan arbitrary bytes. Invalid UTF-8 is scanned as-is; names and
    /// signatures are decoded lossily.
    pub fn scan_bytes(
        &self,
        bytes: &[u8],
        filename: &str,
        profile_override: Option<ProfileId>,
    ) -> Result<ScanResult, ScanError> {
        let classification = self.classify(filename, bytes, profile_override);
        let profile = self.profiles.get(classification.profile);
        let tunables = self.options.tunables(profile.id);
        let index = LineIndex::new(bytes);
        let mut diags = Diagnostics::new();

        debug!(
            file = filename,
            profile = %profile.id,
            by = ?classification.classified_by,
            "classified"
        );
        if classification.classified_by == ClassifiedBy::Fallback {
            diags.warning(
                DiagnosticKind::UnrecognizedProfile,
                Span::empty(0, &index),
                format!("no profile recognized for '{filename}'; using the generic profile"),
            );
        }

        let masked = scrub::mask(bytes, &profile.lexical, &index, &mut diags);
        let candidates = matcher::find_candidates(&masked, &index, profile, tunables, &mut diags);
        let bodies = blocks::resolve_bodies(
            masked.as_bytes(),
            &index,
            profile.block_style,
            tunables,
            &candidates,
            &mut diags,
        );
        let definitions =
            aggregate::build_records(bytes, &masked, &index, profile, &candidates, &bodies);
        aggregate::validate(&definitions, bytes.len(), masked.len())?;

        let diagnostics = diags.finish();
        debug!(
            file = filename,
            definitions = definitions.len(),
            diagnostics = diagnostics.len(),
            "scanned"
        );

        Ok(ScanResult {
            profile: profile.id,
            classified_by: classification.classified_by,
            definitions,
            diagnostics,
        })
    }

    /// Brace, paren and bracket balance of the masked text.
    pub fn check_balance(
        &self,
        bytes: &[u8],
        filename: &str,
        profile_override: Option<ProfileId>,
    ) -> Balance {
        let classification = self.classify(filename, bytes, profile_override);
        let profile = self.profiles.get(classification.profile);
        let index = LineIndex::new(bytes);
        let mut diags = Diagnostics::new();
        let masked = scrub::mask(bytes, &profile.lexical, &index, &mut diags);
        blocks::check_balance(masked.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Convenience entry points
// ---------------------------------------------------------------------------

/// Scan `text` with default options.
pub fn scan(
    text: &str,
    filename: &str,
    profile_override: Option<ProfileId>,
) -> Result<ScanResult, ScanError> {
    Scanner::default().scan(text, filename, profile_override)
}

/// Scan raw bytes with default options.
pub fn scan_bytes(
    bytes: &[u8],
    filename: &str,
    profile_override: Option<ProfileId>,
) -> Result<ScanResult, ScanError> {
    Scanner::default().scan_bytes(bytes, filename, profile_override)
}
