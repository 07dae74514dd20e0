use std::ops::RangeInclusive;

use crate::fabric::FabricError;

/// Parse an inclusive range such as `"1-4"`, yielding 1, 2, 3 and 4.
///
/// Used for fabric interface ordinals and BGP AS numbers. Whitespace around
/// either bound is ignored. Values are produced lazily, so wide 4-byte ASN
/// ranges cost nothing up front.
pub fn parse_range(input: &str) -> Result<RangeInclusive<u32>, FabricError> {
    let mut parts = input.split('-');
    let (start, end) = match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(end), None) => (start, end),
        _ => {
            return Err(FabricError::malformed_range(
                input,
                "expected exactly two bounds separated by one '-'",
            ))
        }
    };

    let start = parse_bound(input, start)?;
    let end = parse_bound(input, end)?;
    if start > end {
        return Err(FabricError::malformed_range(
            input,
            format!("start {} is greater than end {}", start, end),
        ));
    }

    Ok(start..=end)
}

fn parse_bound(input: &str, bound: &str) -> Result<u32, FabricError> {
    let bound = bound.trim();
    bound
        .parse::<u32>()
        .map_err(|e| FabricError::malformed_range(input, format!("bad bound '{}': {}", bound, e)))
}
