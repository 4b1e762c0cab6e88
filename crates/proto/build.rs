fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fds = protox::compile(["src/orchestrator.proto"], ["src/"])?;

    let mut config = prost_build::Config::new();
    config.enable_type_names();
    config.compile_fds(fds)?;

    Ok(())
}
