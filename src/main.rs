fn main() -> anyhow::Result<()> {
    treeroute::cli::run_cli()
}
