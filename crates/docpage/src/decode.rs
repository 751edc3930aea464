//! Structural decoding of raw documents into typed records.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Document, Error, Result, TRACING_TARGET_DECODE};

/// How a batch decode reacts to a document that does not fit the record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// The first failing document fails the whole batch.
    FailFast,
    /// Failing documents are dropped and the rest of the batch is kept.
    SkipInvalid,
}

/// Decodes raw documents into records of type `T`.
///
/// Decoding is structural and driven by the record's `Deserialize`
/// implementation: keys map to fields by name (honoring `serde` renames),
/// unknown keys are ignored, missing keys fall back to the field default when
/// the record is marked `#[serde(default)]`, and a value of the wrong type
/// fails that one document.
pub struct Decoder<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T> Decoder<T>
where
    T: DeserializeOwned,
{
    /// Creates a new decoder for records of type `T`.
    #[inline]
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }

    /// Decodes a single document.
    pub fn decode(&self, document: Document) -> Result<T> {
        serde_json::from_value(Value::Object(document)).map_err(Error::from)
    }

    /// Decodes a batch of documents, preserving their order.
    ///
    /// With [`DecodePolicy::FailFast`] the returned error names the index of
    /// the offending document. With [`DecodePolicy::SkipInvalid`] this never
    /// fails; dropped documents are logged.
    pub fn decode_all(&self, documents: Vec<Document>, policy: DecodePolicy) -> Result<Vec<T>> {
        let mut records = Vec::with_capacity(documents.len());
        let mut skipped = 0usize;

        for (index, document) in documents.into_iter().enumerate() {
            match self.decode(document) {
                Ok(record) => records.push(record),
                Err(error) => match policy {
                    DecodePolicy::FailFast => {
                        tracing::debug!(
                            target: TRACING_TARGET_DECODE,
                            record = index,
                            error = %error,
                            "Document failed to decode, aborting page"
                        );
                        return Err(Error::decode()
                            .with_message(format!("record {index}: {}", detail(&error)))
                            .with_source(error));
                    }
                    DecodePolicy::SkipInvalid => {
                        tracing::warn!(
                            target: TRACING_TARGET_DECODE,
                            record = index,
                            error = %error,
                            "Skipping document that failed to decode"
                        );
                        skipped += 1;
                    }
                },
            }
        }

        if skipped > 0 {
            tracing::debug!(
                target: TRACING_TARGET_DECODE,
                decoded = records.len(),
                skipped,
                "Decoded page with skipped documents"
            );
        }

        Ok(records)
    }
}

impl<T> Default for Decoder<T>
where
    T: DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Decoder<T> {
    fn clone(&self) -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> Copy for Decoder<T> {}

impl<T> std::fmt::Debug for Decoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("record", &std::any::type_name::<T>())
            .finish()
    }
}

fn detail(error: &Error) -> &str {
    error.message.as_deref().unwrap_or("invalid document")
}
