use anyhow::Result;
use document_versions::terminal::serve;

fn main() -> Result<()> {
    serve()
}
