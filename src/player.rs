//! Record loop: header reading, dispatch, size validation and playback
//!
//! The stream is read strictly forward, one record at a time. Cancellation
//! is only honoured between records.

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info, warn};

use crate::context::PlaybackContext;
use crate::error::{WmfError, WmfResult};
use crate::record::Record;
use crate::wmf::{parse_header, WmfHeader};

/// RecordSize (u32) and RecordFunction (u16)
pub const RECORD_HEADER_SIZE: usize = 6;

/// What to do when a record's layout does not account for its declared size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// Log, skip to the declared end and keep playing
    #[default]
    TrustDeclared,
    /// Abort with [`WmfError::SizeMismatch`]
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackOptions {
    pub size_policy: SizePolicy,
    /// Stop at META_EOF rather than at the end of the buffer
    pub stop_at_eof: bool,
    pub max_records: Option<usize>,
    /// Resolution used to size placeable metafiles
    pub dpi: f64,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            size_policy: SizePolicy::TrustDeclared,
            stop_at_eof: true,
            max_records: None,
            dpi: 96.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackSummary {
    pub played: usize,
    pub unsupported: usize,
    pub mismatched: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Stream offset of the header
    pub offset: usize,
    pub size_words: u32,
    pub function: u16,
}

impl RecordHeader {
    /// Read the header at `offset` and check the record fits in `data`
    pub fn read(data: &[u8], offset: usize) -> WmfResult<Self> {
        let Some(raw) = data.get(offset..offset + RECORD_HEADER_SIZE) else {
            return Err(WmfError::InvalidRecordSize {
                offset,
                size: data.len().saturating_sub(offset) as u32,
            });
        };
        let header = Self {
            offset,
            size_words: LittleEndian::read_u32(&raw[0..4]),
            function: LittleEndian::read_u16(&raw[4..6]),
        };

        let size_bytes = header.size_words as u64 * 2;
        if size_bytes < RECORD_HEADER_SIZE as u64 || offset as u64 + size_bytes > data.len() as u64 {
            return Err(WmfError::InvalidRecordSize {
                offset,
                size: header.size_words,
            });
        }
        Ok(header)
    }

    pub fn size_bytes(&self) -> usize {
        self.size_words as usize * 2
    }

    pub fn body_len(&self) -> usize {
        self.size_bytes() - RECORD_HEADER_SIZE
    }

    pub fn body_offset(&self) -> usize {
        self.offset + RECORD_HEADER_SIZE
    }

    pub fn end(&self) -> usize {
        self.offset + self.size_bytes()
    }
}

/// Decode the body that follows `header`
pub fn decode_record(header: &RecordHeader, body: &[u8]) -> WmfResult<(Record, usize)> {
    Record::decode(header.function, body, header.body_offset())
}

/// One record as read from the stream
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub header: RecordHeader,
    pub record: Record,
    /// Bytes the record layout accounts for
    pub consumed: usize,
}

impl DecodedRecord {
    pub fn is_size_mismatch(&self) -> bool {
        self.consumed != self.header.body_len()
    }
}

/// Forward iterator over the records of a byte slice.
///
/// Stops after the first error.
pub struct RecordReader<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> RecordReader<'a> {
    /// `offset` is where the first record header starts
    pub fn new(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset,
            failed: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = WmfResult<DecodedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        let result = RecordHeader::read(self.data, self.offset).and_then(|header| {
            let body = &self.data[header.body_offset()..header.end()];
            let (record, consumed) = decode_record(&header, body)?;
            Ok(DecodedRecord {
                header,
                record,
                consumed,
            })
        });

        match &result {
            Ok(decoded) => self.offset = decoded.header.end(),
            Err(_) => self.failed = true,
        }
        Some(result)
    }
}

pub struct Player {
    options: PlaybackOptions,
}

impl Player {
    pub fn new(options: PlaybackOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    /// Compare consumed bytes against the declared body length.
    ///
    /// Returns whether a tolerated mismatch was seen.
    pub fn validate(&self, decoded: &DecodedRecord) -> WmfResult<bool> {
        if !decoded.is_size_mismatch() {
            return Ok(false);
        }
        let Some(record) = decoded.record.record_type() else {
            return Ok(false);
        };
        let declared = decoded.header.body_len();
        match self.options.size_policy {
            SizePolicy::Strict => Err(WmfError::SizeMismatch {
                record,
                offset: decoded.header.offset,
                declared,
                consumed: decoded.consumed,
            }),
            SizePolicy::TrustDeclared => {
                warn!(
                    "{:?} record at offset {} declares {} body bytes but uses {}",
                    record, decoded.header.offset, declared, decoded.consumed
                );
                Ok(true)
            }
        }
    }

    /// Play every record of a complete metafile against `ctx`
    pub fn play(&self, data: &[u8], ctx: &mut dyn PlaybackContext) -> WmfResult<PlaybackSummary> {
        self.play_with(data, ctx, |_| true)
    }

    /// Like [`Player::play`], asking `keep_going` before each record.
    ///
    /// `keep_going` receives the number of records played so far; returning
    /// `false` stops with [`WmfError::Cancelled`].
    pub fn play_with<F>(
        &self,
        data: &[u8],
        ctx: &mut dyn PlaybackContext,
        keep_going: F,
    ) -> WmfResult<PlaybackSummary>
    where
        F: FnMut(usize) -> bool,
    {
        let header = parse_header(data)?;
        self.play_parsed(data, &header, ctx, keep_going)
    }

    /// Like [`Player::play_with`] for a caller that already parsed `header`
    /// from `data`
    pub fn play_parsed<F>(
        &self,
        data: &[u8],
        header: &WmfHeader,
        ctx: &mut dyn PlaybackContext,
        mut keep_going: F,
    ) -> WmfResult<PlaybackSummary>
    where
        F: FnMut(usize) -> bool,
    {
        let mut summary = PlaybackSummary::default();

        for decoded in RecordReader::new(data, header.records_offset) {
            if let Some(max) = self.options.max_records {
                if summary.played >= max {
                    info!("stopping after {} records", max);
                    break;
                }
            }
            if !keep_going(summary.played) {
                return Err(WmfError::Cancelled {
                    records: summary.played,
                });
            }

            let decoded = decoded?;
            if self.validate(&decoded)? {
                summary.mismatched += 1;
            }

            match &decoded.record {
                Record::Eof => {
                    debug!("META_EOF at offset {}", decoded.header.offset);
                    if self.options.stop_at_eof {
                        break;
                    }
                    continue;
                }
                Record::Unsupported { function, len } => {
                    debug!(
                        "skipped function 0x{:04X} ({} bytes) at offset {}",
                        function, len, decoded.header.offset
                    );
                    summary.unsupported += 1;
                }
                record => record.apply(ctx),
            }
            summary.played += 1;
        }

        info!(
            "played {} records ({} unsupported, {} size mismatches)",
            summary.played, summary.unsupported, summary.mismatched
        );
        Ok(summary)
    }
}

/// Play a complete metafile with `options`
pub fn play(
    data: &[u8],
    ctx: &mut dyn PlaybackContext,
    options: &PlaybackOptions,
) -> WmfResult<PlaybackSummary> {
    Player::new(options.clone()).play(data, ctx)
}

pub fn play_with<F>(
    data: &[u8],
    ctx: &mut dyn PlaybackContext,
    options: &PlaybackOptions,
    keep_going: F,
) -> WmfResult<PlaybackSummary>
where
    F: FnMut(usize) -> bool,
{
    Player::new(options.clone()).play_with(data, ctx, keep_going)
}
