//! Extraction of the human-readable gateway error and the bounded-length
//! gateway error code from each response shape.
//!
//! The class-name abbreviation is byte-for-byte compatible with historically
//! stored error codes, so the greedy left-to-right segment trimming must not
//! be replaced with a generic ellipsis truncation.

use crate::domain::gateway::{ModificationResult, PurchaseOutcome, PurchaseResult};
use crate::domain::properties::{
    PROPERTY_EXCEPTION_CLASS, PROPERTY_EXCEPTION_MESSAGE, Properties,
};
use crate::domain::record::ResponseRecord;

pub const ERROR_CODE_MAX_LENGTH: usize = 32;

/// Error message for a purchase result: explicit refusal reason first, then
/// the exception message from the additional-data map.
pub fn purchase_error(result: &PurchaseResult) -> Option<String> {
    if let PurchaseOutcome::Business {
        refusal_reason: Some(reason),
        ..
    } = &result.outcome
    {
        return Some(reason.clone());
    }
    exception_message(&result.additional_data)
}

/// Error code for a purchase result: the business result code, else the
/// (abbreviated) exception class name.
pub fn purchase_error_code(result: &PurchaseResult) -> Option<String> {
    match &result.outcome {
        PurchaseOutcome::Business { result, .. } => Some(result.as_code().to_string()),
        PurchaseOutcome::TechnicalFailure(_) => exception_class(&result.additional_data),
    }
}

pub fn modification_error(result: &ModificationResult) -> Option<String> {
    exception_message(&result.additional_data)
}

pub fn modification_error_code(result: &ModificationResult) -> Option<String> {
    result
        .response
        .clone()
        .or_else(|| exception_class(&result.additional_data))
}

/// Replay-path message extraction from a persisted row.
pub fn record_error(record: &ResponseRecord) -> Option<String> {
    record
        .refusal_reason
        .clone()
        .or_else(|| exception_message(&record.additional_data))
}

/// Replay-path code extraction: result code, else the stored PSP result,
/// else the (abbreviated) exception class name.
pub fn record_error_code(record: &ResponseRecord) -> Option<String> {
    record
        .result_code
        .clone()
        .or_else(|| record.psp_result.clone())
        .or_else(|| exception_class(&record.additional_data))
}

/// Blunt cut to [`ERROR_CODE_MAX_LENGTH`] characters, applied uniformly as
/// the very last step on every path.
pub fn truncate_error_code(code: Option<String>) -> Option<String> {
    code.map(|code| {
        if code.chars().count() <= ERROR_CODE_MAX_LENGTH {
            code
        } else {
            code.chars().take(ERROR_CODE_MAX_LENGTH).collect()
        }
    })
}

fn exception_message(additional_data: &Properties) -> Option<String> {
    additional_data
        .get(PROPERTY_EXCEPTION_MESSAGE)
        .map(str::to_string)
}

fn exception_class(additional_data: &Properties) -> Option<String> {
    additional_data.get(PROPERTY_EXCEPTION_CLASS).map(|name| {
        if name.len() <= ERROR_CODE_MAX_LENGTH {
            name.to_string()
        } else {
            abbreviate_class_name(name)
        }
    })
}

/// Shortens a fully qualified dotted class name towards
/// [`ERROR_CODE_MAX_LENGTH`] characters.
///
/// Package segments are trimmed greedily left-to-right to a single leading
/// character while characters still need trimming; the final segment (the
/// class simple name) is never abridged. Names without dots are returned
/// unmodified even when too long; the blunt cut in
/// [`truncate_error_code`] handles those.
pub fn abbreviate_class_name(fq_name: &str) -> String {
    let dot_indexes: Vec<usize> = fq_name.match_indices('.').map(|(i, _)| i).collect();
    if dot_indexes.is_empty() {
        return fq_name.to_string();
    }

    let lengths = compute_segment_lengths(fq_name, &dot_indexes);
    let mut buf = String::with_capacity(ERROR_CODE_MAX_LENGTH);
    for (i, len) in lengths.iter().enumerate() {
        if i == 0 {
            buf.push_str(&fq_name[..len - 1]);
        } else {
            let start = dot_indexes[i - 1];
            buf.push_str(&fq_name[start..start + len]);
        }
    }
    buf
}

/// For each package segment, the number of characters to keep (plus one for
/// the separator slot, mirroring how the segments are stitched back
/// together). The trim budget is consumed left to right.
fn compute_segment_lengths(name: &str, dot_indexes: &[usize]) -> Vec<usize> {
    let mut to_trim = name.len() as isize - ERROR_CODE_MAX_LENGTH as isize;
    let mut lengths = Vec::with_capacity(dot_indexes.len() + 1);

    let mut previous_dot: isize = -1;
    for &dot in dot_indexes {
        let available = dot as isize - previous_dot - 1;
        let len = if to_trim > 0 { available.min(1) } else { available };
        to_trim -= available - len;
        lengths.push((len + 1) as usize);
        previous_dot = dot as isize;
    }

    // The class simple name, including its leading dot, stays whole.
    lengths.push(name.len() - dot_indexes[dot_indexes.len() - 1]);
    lengths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::{CallErrorStatus, PspResult};

    #[test]
    fn test_abbreviation_example() {
        let name = "com.example.very.long.package.name.SomeExceptionClass";
        assert_eq!(name.len(), 53);
        let abbreviated = abbreviate_class_name(name);
        assert_eq!(abbreviated, "c.e.v.l.p.n.SomeExceptionClass");
        assert!(abbreviated.len() <= ERROR_CODE_MAX_LENGTH);
        assert!(abbreviated.ends_with(".SomeExceptionClass"));
    }

    #[test]
    fn test_abbreviation_trims_only_what_is_needed() {
        // 35 chars: three over budget, so only the first two segments shrink.
        let name = "org.apache.commons.lang.StringUtils";
        assert_eq!(abbreviate_class_name(name), "o.a.commons.lang.StringUtils");
    }

    #[test]
    fn test_abbreviation_idempotent_for_short_names() {
        let name = "java.io.IOException";
        assert_eq!(abbreviate_class_name(name), name);
    }

    #[test]
    fn test_abbreviation_leaves_dotless_names_alone() {
        let name = "AVeryLongExceptionNameWithoutAnyDotsInIt";
        assert_eq!(abbreviate_class_name(name), name);
        // ...and the blunt cut caps it afterwards.
        let cut = truncate_error_code(Some(name.to_string())).unwrap();
        assert_eq!(cut.len(), ERROR_CODE_MAX_LENGTH);
    }

    #[test]
    fn test_truncate_is_a_no_op_within_budget() {
        assert_eq!(
            truncate_error_code(Some("Refused".to_string())),
            Some("Refused".to_string())
        );
        assert_eq!(truncate_error_code(None), None);
    }

    #[test]
    fn test_long_simple_name_still_bounded_after_cut() {
        let name = "a.b.AnExtremelyLongSimpleClassNameThatBlowsTheBudgetByItself";
        let abbreviated = abbreviate_class_name(name);
        assert!(abbreviated.starts_with("a.b."));
        let cut = truncate_error_code(Some(abbreviated)).unwrap();
        assert_eq!(cut.chars().count(), ERROR_CODE_MAX_LENGTH);
    }

    fn refused_result() -> PurchaseResult {
        PurchaseResult {
            outcome: PurchaseOutcome::Business {
                result: PspResult::Refused,
                refusal_reason: Some("Insufficient funds".to_string()),
            },
            psp_reference: Some("8814450".to_string()),
            auth_code: None,
            form_parameters: Properties::new(),
            additional_data: Properties::new(),
        }
    }

    #[test]
    fn test_purchase_error_prefers_refusal_reason() {
        let result = refused_result();
        assert_eq!(purchase_error(&result), Some("Insufficient funds".to_string()));
        assert_eq!(purchase_error_code(&result), Some("Refused".to_string()));
    }

    #[test]
    fn test_purchase_error_falls_back_to_exception_data() {
        let result = PurchaseResult {
            outcome: PurchaseOutcome::TechnicalFailure(CallErrorStatus::ResponseNotReceived),
            psp_reference: None,
            auth_code: None,
            form_parameters: Properties::new(),
            additional_data: Properties::new()
                .with(PROPERTY_EXCEPTION_MESSAGE, "Read timed out")
                .with(
                    PROPERTY_EXCEPTION_CLASS,
                    "com.example.very.long.package.name.SomeExceptionClass",
                ),
        };
        assert_eq!(purchase_error(&result), Some("Read timed out".to_string()));
        assert_eq!(
            purchase_error_code(&result),
            Some("c.e.v.l.p.n.SomeExceptionClass".to_string())
        );
    }

    #[test]
    fn test_modification_error_code_prefers_response() {
        let result = ModificationResult {
            technically_successful: true,
            psp_reference: Some("8814451".to_string()),
            response: Some("[capture-received]".to_string()),
            additional_data: Properties::new()
                .with(PROPERTY_EXCEPTION_CLASS, "ignored.when.response.Present"),
        };
        assert_eq!(
            modification_error_code(&result),
            Some("[capture-received]".to_string())
        );
        assert_eq!(modification_error(&result), None);
    }
}
