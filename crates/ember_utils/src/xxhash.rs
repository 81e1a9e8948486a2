use base64_simd::URL_SAFE_NO_PAD;
use xxhash_rust::xxh3::xxh3_128;

/// Content hash used for module change detection and `[contentHash]` file names.
pub fn xxhash_base64_url(input: &[u8]) -> String {
  let hash = xxh3_128(input).to_le_bytes();
  URL_SAFE_NO_PAD.encode_to_string(hash)
}

/// Hashes several parts as one stream. Every part is length-prefixed so `["ab", "c"]` and
/// `["a", "bc"]` never collide.
pub fn xxhash_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> String {
  let mut buf = Vec::new();
  for part in parts {
    buf.extend_from_slice(&(part.len() as u64).to_le_bytes());
    buf.extend_from_slice(part);
  }
  xxhash_base64_url(&buf)
}

#[test]
fn test_xxhash_base64_url() {
  let hash = xxhash_base64_url(b"hello");
  assert_eq!(hash.len(), 22);
  assert_eq!(hash, xxhash_base64_url(b"hello"));
  assert_ne!(hash, xxhash_base64_url(b"hello!"));
}

#[test]
fn test_xxhash_parts_is_boundary_sensitive() {
  assert_ne!(xxhash_parts([&b"ab"[..], b"c"]), xxhash_parts([&b"a"[..], b"bc"]));
  assert_eq!(xxhash_parts([&b"a"[..], b"bc"]), xxhash_parts([&b"a"[..], b"bc"]));
}
