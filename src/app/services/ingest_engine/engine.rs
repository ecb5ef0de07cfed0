//! Preview and commit orchestration across the three parser paths

use tracing::{debug, info};

use crate::app::services::axis_scorer::{AxisCandidate, score_columns};
use crate::app::services::canonicalizer::canonicalize;
use crate::app::services::delimited_parser::DelimitedParser;
use crate::app::services::fits_reader::FitsInspector;
use crate::app::services::format_sniffer::sniff_format;
use crate::app::services::jcamp_parser::parse_jcamp;
use crate::app::services::text_decoder::{decode_text, extract_preamble};
use crate::config::IngestConfig;
use crate::constants::messages;
use crate::models::{
    AxisScore, ColumnInfo, ColumnSelection, IngestPreview, ParsedSeries, ParserDecisions,
    ParserKind, Preamble, PreviewOptions, RawPayload, TextEncoding, normalize_unit,
};
use crate::Result;

/// Stateless ingestion engine.
///
/// Holds only its configuration, so one instance can serve any number of
/// concurrent calls. Every call works on its own copy of the decoded data.
#[derive(Debug, Clone, Default)]
pub struct IngestEngine {
    config: IngestConfig,
}

/// Raw series from one parser path, before canonicalization
#[derive(Debug, Default)]
struct Extracted {
    title: Option<String>,
    x: Vec<f64>,
    y: Vec<f64>,
    x_unit_hint: Option<String>,
    y_unit_hint: Option<String>,
    decisions: ParserDecisions,
    warnings: Vec<String>,
    preamble: Preamble,

    /// An X/Y mapping was given or inferred
    mapped: bool,
}

fn axis_scores(columns: &[ColumnInfo]) -> Vec<AxisScore> {
    let candidates: Vec<AxisCandidate<'_>> = columns
        .iter()
        .map(|c| AxisCandidate::new(c.index, &c.name, c.is_numeric))
        .collect();
    score_columns(&candidates)
}

fn numeric_column(index: usize, name: &str) -> ColumnInfo {
    ColumnInfo {
        index,
        name: name.to_string(),
        is_numeric: true,
        non_numeric_count: 0,
    }
}

impl IngestEngine {
    /// Engine with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    fn empty_preview(raw: &RawPayload, parser: ParserKind, encoding: TextEncoding) -> IngestPreview {
        IngestPreview {
            file_name: raw.file_name().to_string(),
            file_size_bytes: raw.len(),
            encoding,
            parser,
            delimiter: None,
            has_header: true,
            hdu_index: None,
            fits_hdu_candidates: None,
            x_unit_hint: None,
            y_unit_hint: None,
            columns: Vec::new(),
            axis_scores: Vec::new(),
            preview_rows: Vec::new(),
            suggested_x_index: None,
            suggested_y_index: None,
            warnings: Vec::new(),
            source_preamble: None,
            source_metadata: None,
        }
    }

    /// Sniff the payload and describe it well enough for a user to confirm
    /// a column mapping.
    ///
    /// Fails only for a gzip-wrapped FITS that cannot be inflated or a FITS
    /// payload whose primary header is unreadable.
    pub fn preview(&self, raw: &RawPayload, options: &PreviewOptions) -> Result<IngestPreview> {
        let max_rows = options.max_rows.unwrap_or(self.config.preview_rows);
        let sniffed = sniff_format(raw.file_name(), raw.bytes(), self.config.magic_sniff_bytes)?;

        let preview = match sniffed.parser {
            ParserKind::Fits => self.preview_fits(raw, &sniffed.payload, options.hdu_index, max_rows)?,
            ParserKind::JcampDx => self.preview_jcamp(raw, max_rows),
            ParserKind::DelimitedText => self.preview_delimited(raw, max_rows),
        };

        info!(
            "Previewed {} as {}: {} columns, {} rows, {} warnings",
            raw.file_name(),
            preview.parser,
            preview.columns.len(),
            preview.preview_rows.len(),
            preview.warnings.len()
        );
        Ok(preview)
    }

    fn preview_fits(
        &self,
        raw: &RawPayload,
        payload: &[u8],
        hdu_index: Option<usize>,
        max_rows: usize,
    ) -> Result<IngestPreview> {
        let inspector = FitsInspector::open(raw.file_name(), payload)?;
        let fits = inspector.preview(hdu_index, max_rows);

        let mut preview = Self::empty_preview(raw, ParserKind::Fits, TextEncoding::Binary);
        preview.axis_scores = axis_scores(&fits.columns);
        preview.hdu_index = fits.hdu_index;
        preview.fits_hdu_candidates = Some(fits.candidates);
        preview.x_unit_hint = fits.x_unit_hint;
        preview.y_unit_hint = fits.y_unit_hint;
        preview.columns = fits.columns;
        preview.preview_rows = fits.preview_rows;
        preview.suggested_x_index = fits.suggested_x_index;
        preview.suggested_y_index = fits.suggested_y_index;
        preview.warnings = fits.warnings;
        Ok(preview)
    }

    fn preview_jcamp(&self, raw: &RawPayload, max_rows: usize) -> IngestPreview {
        let decoded = decode_text(raw.bytes());
        let spectrum = parse_jcamp(&decoded.text);
        let canonical = canonicalize(spectrum.x, spectrum.y);

        let mut preview = Self::empty_preview(raw, ParserKind::JcampDx, decoded.encoding);
        preview.columns = vec![numeric_column(0, "x"), numeric_column(1, "y")];
        preview.axis_scores = axis_scores(&preview.columns);
        preview.preview_rows = canonical
            .x
            .iter()
            .zip(&canonical.y)
            .take(max_rows)
            .map(|(x, y)| vec![x.to_string(), y.to_string()])
            .collect();
        preview.suggested_x_index = Some(0);
        preview.suggested_y_index = Some(1);
        preview.x_unit_hint = spectrum.x_unit;
        preview.y_unit_hint = spectrum.y_unit;
        preview.warnings = spectrum.warnings;
        preview.warnings.extend(canonical.warnings);
        preview.source_metadata =
            (!spectrum.header.is_empty()).then(|| spectrum.header.into_entries());
        preview
    }

    fn preview_delimited(&self, raw: &RawPayload, max_rows: usize) -> IngestPreview {
        let decoded = decode_text(raw.bytes());
        let preamble = extract_preamble(&decoded.text, self.config.max_preamble_lines);
        let parsed = DelimitedParser::new(&self.config).preview(&decoded.text, max_rows);

        let mut preview = Self::empty_preview(raw, ParserKind::DelimitedText, decoded.encoding);
        preview.delimiter = Some(parsed.table.delimiter);
        preview.has_header = parsed.table.has_header;
        preview.axis_scores = axis_scores(&parsed.columns);
        preview.columns = parsed.columns;
        preview.preview_rows = parsed.preview_rows;
        preview.suggested_x_index = parsed.suggested_x_index;
        preview.suggested_y_index = parsed.suggested_y_index;
        preview.x_unit_hint = parsed.x_unit_hint;
        preview.y_unit_hint = parsed.y_unit_hint;
        preview.warnings = parsed.warnings;
        preview.source_preamble = preamble.lines_or_none();
        preview.source_metadata = preamble.metadata_or_none();
        preview
    }

    /// Parse the whole payload with a confirmed (or inferred) mapping and
    /// return the canonical series.
    ///
    /// Missing indices fall back to the preview suggestion; with no
    /// suggestion the series is empty and carries a warning.
    pub fn commit(&self, raw: &RawPayload, selection: &ColumnSelection) -> Result<ParsedSeries> {
        let sniffed = sniff_format(raw.file_name(), raw.bytes(), self.config.magic_sniff_bytes)?;

        let extracted = match sniffed.parser {
            ParserKind::Fits => self.extract_fits(raw, &sniffed.payload, selection)?,
            ParserKind::JcampDx => self.extract_jcamp(raw),
            ParserKind::DelimitedText => self.extract_delimited(raw, selection),
        };

        let series = Self::finish(raw, sniffed.parser, extracted, selection);
        info!(
            "Committed {} as {}: {} points, action={}, {} warnings",
            series.source_file_name,
            series.parser,
            series.x_count,
            series.parser_decisions.canonicalization,
            series.warnings.len()
        );
        Ok(series)
    }

    fn extract_fits(
        &self,
        raw: &RawPayload,
        payload: &[u8],
        selection: &ColumnSelection,
    ) -> Result<Extracted> {
        let inspector = FitsInspector::open(raw.file_name(), payload)?;
        let fits = inspector.extract_xy(selection.hdu_index, selection.x_index, selection.y_index);

        let decisions = ParserDecisions {
            encoding: Some(TextEncoding::Binary),
            hdu_index: fits.hdu_index,
            hdu_name: fits.hdu_name,
            x_index: fits.x_index,
            y_index: fits.y_index,
            x_col: fits.x_col,
            y_col: fits.y_col,
            non_numeric_coerced: fits.coerced,
            ..ParserDecisions::default()
        };

        Ok(Extracted {
            mapped: decisions.x_col.is_some() && decisions.y_col.is_some(),
            x: fits.x,
            y: fits.y,
            x_unit_hint: fits.x_unit,
            y_unit_hint: fits.y_unit,
            decisions,
            warnings: fits.warnings,
            ..Extracted::default()
        })
    }

    fn extract_jcamp(&self, raw: &RawPayload) -> Extracted {
        let decoded = decode_text(raw.bytes());
        let spectrum = parse_jcamp(&decoded.text);

        let decisions = ParserDecisions {
            encoding: Some(decoded.encoding),
            data_mode: spectrum.data_mode,
            jcamp_header: Some(spectrum.header.into_entries()),
            ..ParserDecisions::default()
        };

        Extracted {
            title: spectrum.title,
            x: spectrum.x,
            y: spectrum.y,
            x_unit_hint: spectrum.x_unit,
            y_unit_hint: spectrum.y_unit,
            decisions,
            warnings: spectrum.warnings,
            mapped: true,
            ..Extracted::default()
        }
    }

    fn extract_delimited(&self, raw: &RawPayload, selection: &ColumnSelection) -> Extracted {
        let decoded = decode_text(raw.bytes());
        let preamble = extract_preamble(&decoded.text, self.config.max_preamble_lines);
        let parser = DelimitedParser::new(&self.config);

        let (x_index, y_index) = if selection.has_columns() {
            (selection.x_index, selection.y_index)
        } else {
            let suggestion = parser.preview(&decoded.text, self.config.preview_rows);
            debug!(
                "No explicit mapping for {}; suggestion x={:?} y={:?}",
                raw.file_name(),
                suggestion.suggested_x_index,
                suggestion.suggested_y_index
            );
            (
                selection.x_index.or(suggestion.suggested_x_index),
                selection.y_index.or(suggestion.suggested_y_index),
            )
        };

        let (Some(xi), Some(yi)) = (x_index, y_index) else {
            let table = parser.tabulate(&decoded.text, Some(0)).table;
            return Extracted {
                decisions: ParserDecisions {
                    encoding: Some(decoded.encoding),
                    delimiter: Some(table.delimiter),
                    has_header: Some(table.has_header),
                    ..ParserDecisions::default()
                },
                warnings: vec![messages::NO_COLUMN_MAPPING.to_string()],
                preamble,
                ..Extracted::default()
            };
        };

        let series = parser.extract_xy(&decoded.text, xi, yi);
        let mut warnings = series.warnings;
        let skipped = series.stats.rows_skipped();
        if skipped > 0 && series.stats.pairs_parsed > 0 {
            warnings.push(format!(
                "Skipped {} rows with an empty or non-numeric X/Y cell ({} empty, {} non-numeric).",
                skipped, series.stats.skipped_empty, series.stats.skipped_non_numeric
            ));
        }

        let header_name = |i: usize| {
            series
                .has_header
                .then(|| series.header.get(i).cloned())
                .flatten()
        };
        let decisions = ParserDecisions {
            encoding: Some(decoded.encoding),
            delimiter: Some(series.delimiter),
            has_header: Some(series.has_header),
            x_index: Some(xi),
            y_index: Some(yi),
            x_col: header_name(xi),
            y_col: header_name(yi),
            ..ParserDecisions::default()
        };

        Extracted {
            x: series.x,
            y: series.y,
            x_unit_hint: series.x_unit_hint,
            y_unit_hint: series.y_unit_hint,
            decisions,
            warnings,
            preamble,
            mapped: true,
            ..Extracted::default()
        }
    }

    /// Canonicalize, settle units and assemble the result
    fn finish(
        raw: &RawPayload,
        parser: ParserKind,
        extracted: Extracted,
        selection: &ColumnSelection,
    ) -> ParsedSeries {
        let Extracted {
            title,
            x,
            y,
            x_unit_hint,
            y_unit_hint,
            mut decisions,
            mut warnings,
            preamble,
            mapped,
        } = extracted;

        let canonical = canonicalize(x, y);
        warnings.extend(canonical.warnings);
        decisions.canonicalization = canonical.action;
        decisions.dropped_nonfinite = canonical.dropped_nonfinite;

        let already_empty = warnings
            .iter()
            .any(|w| w == messages::NO_XY_PAIRS || w == messages::JCAMP_EMPTY);
        if mapped && canonical.x.is_empty() && !already_empty {
            warnings.push(messages::NO_XY_PAIRS.to_string());
        }

        let x_unit = normalize_unit(selection.x_unit.as_deref()).or(x_unit_hint);
        let y_unit = normalize_unit(selection.y_unit.as_deref()).or(y_unit_hint);
        if x_unit.is_none() {
            warnings.push(messages::X_UNIT_MISSING.to_string());
        }
        if y_unit.is_none() {
            warnings.push(messages::Y_UNIT_MISSING.to_string());
        }

        ParsedSeries {
            source_file_name: raw.file_name().to_string(),
            parser,
            title,
            parser_decisions: decisions,
            x_unit,
            y_unit,
            x_count: canonical.x.len(),
            x: canonical.x,
            y: canonical.y,
            warnings,
            source_preamble: preamble.lines_or_none(),
            source_metadata: preamble.metadata_or_none(),
        }
    }
}
