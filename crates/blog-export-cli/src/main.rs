//! Binary entrypoint for the `blog-export` CLI.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = blog_export_cli::run().await;
    process::exit(exit_code);
}
