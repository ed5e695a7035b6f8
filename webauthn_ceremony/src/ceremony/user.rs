/// Derives the WebAuthn user handle from a username, one byte per character.
///
/// Each character contributes the low 8 bits of its first UTF-16 code unit,
/// matching `Uint8Array.from(username, c => c.charCodeAt(0))` in the browser.
///
/// The handle is predictable and collides for usernames that differ only
/// above the low byte (`"ā"` and `"\u{1}"` both map to `[0x01]`). Relying
/// parties must treat it as opaque and must not rely on it for uniqueness.
pub fn derive_user_handle(username: &str) -> Vec<u8> {
    username
        .chars()
        .map(|c| {
            let mut units = [0u16; 2];
            c.encode_utf16(&mut units)[0] as u8
        })
        .collect()
}
