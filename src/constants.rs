//! Application constants for the spectral ingestion engine
//!
//! This module contains the markers, magic numbers, default limits and axis
//! vocabularies used throughout the ingestion pipeline.

// =============================================================================
// Format Detection
// =============================================================================

/// Gzip stream magic bytes
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Primary FITS header card prefix (keyword padded to 8 columns)
pub const FITS_PRIMARY_MAGIC: &[u8] = b"SIMPLE  ";

/// Extension FITS header card prefix
pub const FITS_EXTENSION_MAGIC: &[u8] = b"XTENSION";

/// File extensions that identify a FITS payload (lowercase)
pub const FITS_EXTENSIONS: &[&str] = &[
    ".fits", ".fit", ".fts", ".fits.gz", ".fit.gz", ".fts.gz",
];

/// Labelled-data-record prefix used by JCAMP-DX files
pub const JCAMP_RECORD_PREFIX: &[u8] = b"##";

/// Uppercase content markers that, together with `##`, identify JCAMP-DX
pub const JCAMP_CONTENT_MARKERS: &[&[u8]] = &[b"JCAMP", b"XYDATA"];

// =============================================================================
// Text Decoding and Preamble Extraction
// =============================================================================

/// Byte order mark for UTF-8 encoded text
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Vendor marker separating an instrument header from the numeric data
/// (Ocean Optics / OceanView exports). Compared case-insensitively.
pub const SPECTRAL_DATA_MARKER: &str = ">>>>>BEGIN SPECTRAL DATA<<<<<";

/// Line prefixes treated as comments in leading preamble sections
pub const COMMENT_PREFIXES: &[&str] = &["#", "//", ";", "!"];

/// Maximum number of preamble lines kept for provenance
pub const MAX_PREAMBLE_LINES: usize = 200;

/// Maximum key length accepted by the `key: value` metadata matcher
pub const MAX_METADATA_KEY_LEN: usize = 64;

// =============================================================================
// Delimited Text
// =============================================================================

/// Delimiters considered by the dialect sniffer, in preference order
pub const SNIFF_DELIMITERS: &[char] = &[',', '\t', ';', '|', ' '];

/// Delimiters considered by the frequency fallback when sniffing fails
pub const FALLBACK_DELIMITERS: &[char] = &[',', '\t', ';', '|'];

/// Fraction of sampled lines that must agree on a delimiter count
pub const DELIMITER_CONSISTENCY_THRESHOLD: f64 = 0.9;

/// Number of rows after the first consulted when deciding header presence
pub const HEADER_SNIFF_ROWS: usize = 20;

/// Prefix for synthesized column names (`col_1`, `col_2`, ...)
pub const SYNTHETIC_COLUMN_PREFIX: &str = "col_";

// =============================================================================
// Processing Defaults
// =============================================================================

/// Default number of rows returned by a preview call
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// Bytes of cleaned text sampled for dialect sniffing
pub const DIALECT_SAMPLE_BYTES: usize = 64 * 1024;

/// Bytes of payload head inspected for magic numbers and content markers
pub const MAGIC_SNIFF_BYTES: usize = 4096;

/// Default byte bound for preview uploads
pub const DEFAULT_MAX_PREVIEW_BYTES: usize = 5 * 1024 * 1024;

/// Default byte bound for commit uploads
pub const DEFAULT_MAX_COMMIT_BYTES: usize = 50 * 1024 * 1024;

/// Minimum number of points before X monotonicity is classified
pub const MIN_POINTS_FOR_ORDERING: usize = 3;

// =============================================================================
// FITS Layout
// =============================================================================

/// FITS logical record size in bytes
pub const FITS_BLOCK_SIZE: usize = 2880;

/// FITS header card width in bytes
pub const FITS_CARD_SIZE: usize = 80;

/// Name astropy-style readers give the primary HDU
pub const FITS_PRIMARY_HDU_NAME: &str = "PRIMARY";

/// HDU names that signal the science spectrum when several tables exist
pub mod preferred_hdu {
    /// Substring match (uppercase)
    pub const CONTAINS: &[&str] = &["SCI"];

    /// Exact match (uppercase)
    pub const EXACT: &[&str] = &["SPECTRUM", "SPEC"];
}

// =============================================================================
// Axis Vocabularies
// =============================================================================

/// Axis-name hint tables consumed by the generic scorer.
///
/// Each entry is `(substring, weight)`; matching is case-insensitive on the
/// trimmed column name. New instrument vocabularies are added here.
pub mod axis_hints {
    /// Score added per matching hint
    pub const HINT_WEIGHT: i32 = 10;

    /// Independent-axis (X) vocabulary: spectral and temporal quantities
    pub const X_HINTS: &[(&str, i32)] = &[
        ("wavelength", HINT_WEIGHT),
        ("wave", HINT_WEIGHT),
        ("lambda", HINT_WEIGHT),
        ("lam", HINT_WEIGHT),
        ("frequency", HINT_WEIGHT),
        ("freq", HINT_WEIGHT),
        ("wavenumber", HINT_WEIGHT),
        ("wnum", HINT_WEIGHT),
        ("nu", HINT_WEIGHT),
        ("time", HINT_WEIGHT),
        ("mjd", HINT_WEIGHT),
        ("jd", HINT_WEIGHT),
        ("bjd", HINT_WEIGHT),
        ("epoch", HINT_WEIGHT),
    ];

    /// Dependent-axis (Y) vocabulary: flux and count-like quantities
    pub const Y_HINTS: &[(&str, i32)] = &[
        ("flux", HINT_WEIGHT),
        ("flx", HINT_WEIGHT),
        ("fnu", HINT_WEIGHT),
        ("f_lambda", HINT_WEIGHT),
        ("f_lam", HINT_WEIGHT),
        ("spec", HINT_WEIGHT),
        ("sci", HINT_WEIGHT),
        ("counts", HINT_WEIGHT),
        ("intensity", HINT_WEIGHT),
        ("rate", HINT_WEIGHT),
        ("pdcsap_flux", HINT_WEIGHT),
        ("sap_flux", HINT_WEIGHT),
    ];

    /// Time-like names; a Y candidate matching any of these is penalized once
    pub const TIME_LIKE: &[&str] = &["time", "mjd", "jd", "bjd", "epoch"];

    /// Penalty applied to time-like Y candidates
    pub const TIME_LIKE_PENALTY: i32 = -50;

    /// Uncertainty-like names; a Y candidate matching any of these is penalized once
    pub const ERROR_LIKE: &[&str] = &["err", "unc", "sigma", "ivar", "var", "variance"];

    /// Penalty applied to uncertainty-like Y candidates
    pub const ERROR_LIKE_PENALTY: i32 = -20;

    /// Bookkeeping columns; every matching hint subtracts a full hint weight
    pub const BOOKKEEPING: &[(&str, i32)] = &[
        ("corr", -HINT_WEIGHT),
        ("quality", -HINT_WEIGHT),
        ("flag", -HINT_WEIGHT),
        ("status", -HINT_WEIGHT),
        ("mask", -HINT_WEIGHT),
    ];
}

// =============================================================================
// Warning Messages
// =============================================================================

/// Human-readable warning texts shared by several pipeline stages
pub mod messages {
    pub const GZIP_PREVIEW_FAILED: &str =
        "File looks like gzip-compressed FITS, but preview decompression failed.";
    pub const NO_FITS_TABLES: &str = "No FITS table HDUs found for 1D spectra.";
    pub const MULTIPLE_FITS_TABLES: &str =
        "Multiple FITS table HDUs detected; please confirm which HDU contains the spectrum.";
    pub const FITS_XY_UNCERTAIN: &str =
        "Could not confidently infer X/Y columns from FITS; please select manually.";
    pub const NO_DATA_ROWS: &str = "No data rows parsed (file may be empty or non-tabular).";
    pub const MULTIPLE_NUMERIC_COLUMNS: &str =
        "Multiple numeric columns detected; please confirm X/Y columns before ingest.";
    pub const SINGLE_NUMERIC_COLUMN: &str = "Only one fully-numeric column detected in preview; \
         file may be messy or require manual mapping.";
    pub const NO_NUMERIC_COLUMNS: &str = "No fully-numeric columns detected in preview; \
         file may be non-tabular or include units/headers in data rows.";
    pub const NO_XY_PAIRS: &str = "No numeric X/Y pairs parsed with the selected column mapping.";
    pub const NO_COLUMN_MAPPING: &str =
        "No X/Y column mapping was provided or inferred; call preview and select columns.";
    pub const X_UNIT_MISSING: &str =
        "X unit is missing; please confirm units for trustworthy comparisons.";
    pub const Y_UNIT_MISSING: &str =
        "Y unit is missing; please confirm units for trustworthy comparisons.";
    pub const AXIS_REVERSED: &str =
        "X axis was decreasing; reversed order for canonical plotting.";
    pub const AXIS_SORTED: &str =
        "X axis was non-monotonic; stable-sorted by X for canonical plotting.";
    pub const JCAMP_NO_XYDATA: &str = "No ##XYDATA block found in JCAMP-DX.";
    pub const JCAMP_MISSING_DELTAX: &str =
        "JCAMP-DX uses X++ mode but DELTAX is missing; cannot expand X grid reliably.";
    pub const JCAMP_ODD_TOKENS: &str =
        "Odd number of numeric tokens in an XYDATA line; trailing value ignored.";
    pub const JCAMP_EMPTY: &str = "No plottable X/Y points were parsed from JCAMP-DX.";
    pub const JCAMP_LENGTH_MISMATCH: &str =
        "Parsed X and Y lengths differ; truncating to shortest length.";
}
