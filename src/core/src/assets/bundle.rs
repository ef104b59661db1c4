use rust_embed::RustEmbed;

/// Third-party style storage library: namespaced `localStorage` instances.
pub const STORAGE_LIBRARY: &str = "xstorage-lib.js";
/// Glue shim speaking the command protocol over the session websocket.
pub const SHIM_SCRIPT: &str = "xlocalstorage.js";

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
pub struct ClientAssets;

/// Bytes and MIME type of bundled file `path`, if it exists.
pub fn asset_response(path: &str) -> Option<(Vec<u8>, String)> {
    let file = ClientAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some((file.data.into_owned(), mime.essence_str().to_string()))
}
