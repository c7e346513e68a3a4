mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use ccb_reforcos::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
