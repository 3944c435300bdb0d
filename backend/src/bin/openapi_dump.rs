//! Print the registration API's OpenAPI document as JSON.

use std::io::Write;

use signup::ApiDoc;
use utoipa::OpenApi;

fn main() -> std::io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")
}
