use etl_append::{cli, errors::AppResult};

fn main() -> AppResult<()> {
    cli::cli()
}
