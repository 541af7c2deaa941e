use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    // An explicit PROTOC wins; otherwise use the bundled compiler.
    let mut config = prost_build::Config::new();
    if std::env::var_os("PROTOC").is_none() {
        config.protoc_executable(protoc_bin_vendored::protoc_bin_path()?);
    }
    let well_known = protoc_bin_vendored::include_path()?;

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .file_descriptor_set_path(out_dir.join("diode_descriptor.bin"))
        .compile_protos_with_config(
            config,
            &["proto/diode/v1/ingester.proto"],
            &[PathBuf::from("proto"), well_known],
        )?;

    println!("cargo:rerun-if-changed=proto/diode/v1/ingester.proto");
    println!("cargo:rerun-if-env-changed=PROTOC");
    Ok(())
}
