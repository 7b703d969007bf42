use std::{env, fs, path::PathBuf};

fn main() {
    let target = env::var("CARGO_CFG_TARGET_ARCH").unwrap();

    if target == "riscv64" {
        // Build startup code and archive it
        let mut cc = cc::Build::new();
        cc.compiler("riscv64-elf-gcc")
            .flag("-march=rv64ima")
            .flag("-mabi=lp64");

        if env::var_os("CARGO_FEATURE_CONFIG_STREAM").is_some() {
            cc.flag("-DCONFIG_STREAM");
        } else {
            cc.flag("-DCONFIG_UART");
        }

        cc.file("src/arch/riscv/startup.S").compile("libstartup.a");

        // Make the linker script available to the final program
        let out = PathBuf::from(env::var("OUT_DIR").unwrap());
        fs::copy("linkers/zisk.ld", out.join("zisk.ld")).unwrap();
        println!("cargo:rustc-link-search={}", out.display());

        println!("cargo:rerun-if-changed=src/arch/riscv/startup.S");
        println!("cargo:rerun-if-changed=linkers/zisk.ld");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
