// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Human-readable byte size parsing, used by [`crate::Config`] to accept
//! knobs like `PHPFINA_MAX_DATA_SIZE=100M` instead of a raw byte count.

/// Decodes a human-readable size such as `"100M"` or `"1K 512"` into a byte
/// count. Recognizes `K`/`M`/`G`/`T` (powers of 1024); a bare number is
/// taken as a byte count.
pub fn decode_size(encoded: &str) -> Result<u64, ()> {
    let mut total: u64 = 0;
    let mut any = false;
    for part in encoded.split_whitespace() {
        let (digits, suffix) = match part.find(|c: char| !c.is_ascii_digit()) {
            Some(i) => part.split_at(i),
            None => (part, ""),
        };
        if digits.is_empty() {
            return Err(());
        }
        let n: u64 = digits.parse().map_err(|_| ())?;
        let mult: u64 = match suffix {
            "" => 1,
            "K" => 1 << 10,
            "M" => 1 << 20,
            "G" => 1 << 30,
            "T" => 1 << 40,
            _ => return Err(()),
        };
        total = total.checked_add(n.checked_mul(mult).ok_or(())?).ok_or(())?;
        any = true;
    }
    if !any {
        return Err(());
    }
    Ok(total)
}
