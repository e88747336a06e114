use assert_cmd::Command;
use dynapse_codec::ConfigWrite;
use predicates::prelude::*;
use std::error::Error;
use tempfile::tempdir;

const PROGRAM: &str = r#"
chip = 8

[[biases]]
name = "C1_IF_THR_N"
coarse = 3
fine = 120

[[cams]]
input = 10
target = 20
slot = 0
synapse = "f_exc"

[[srams]]
neuron = 20
slot = 1
virtual_core = 0
dir_y = "south"
delta_x = 0
delta_y = 1
cores = 15

[[rates]]
neuron = 5
hz = 50.0
"#;

fn dynapse() -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("dynapse")?;
    cmd.env_remove("RUST_LOG").env_remove("DYNAPSE_CONFIG");
    Ok(cmd)
}

#[test]
fn compile_program_to_json() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let program = tmp.path().join("chip.toml");
    std::fs::write(&program, PROGRAM)?;

    let output = dynapse()?.arg("compile").arg(&program).output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let writes: Vec<ConfigWrite> = serde_json::from_slice(&output.stdout)?;
    assert_eq!(writes.len(), 7);
    assert_eq!(writes[0], ConfigWrite::new(5, 1, 8));
    assert_eq!(writes[2].value, 0x4C0A_0014);
    assert_eq!(writes[4], ConfigWrite::new(18, 3, 8));
    assert_eq!((writes[5].module, writes[5].param), (18, 2));
    assert_eq!(writes[6], ConfigWrite::new(18, 1, 5));
    Ok(())
}

#[test]
fn compile_program_to_bincode_file() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let program = tmp.path().join("chip.toml");
    let out = tmp.path().join("chip.bin");
    std::fs::write(&program, PROGRAM)?;

    dynapse()?
        .arg("compile")
        .arg(&program)
        .args(["--format", "bincode", "-o"])
        .arg(&out)
        .assert()
        .success();

    let writes: Vec<ConfigWrite> = bincode::deserialize(&std::fs::read(&out)?)?;
    assert_eq!(writes.len(), 7);
    assert_eq!(writes[0], ConfigWrite::new(5, 1, 8));
    Ok(())
}

#[test]
fn compile_json_program_as_text() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let program = tmp.path().join("chip.json");
    std::fs::write(&program, r#"{"chip": 4, "cams": [{"input": 1, "target": 2, "slot": 3, "synapse": "s_inh"}]}"#)?;

    dynapse()?
        .arg("compile")
        .arg(&program)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CHIP/ID = 0x00000004").and(predicate::str::contains("CHIP/CONTENT")));
    Ok(())
}

#[test]
fn compile_rejects_unknown_bias() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let program = tmp.path().join("bad.toml");
    std::fs::write(&program, "[[biases]]\nname = \"C7_IF_THR_N\"\ncoarse = 0\nfine = 0\n")?;

    dynapse()?
        .arg("compile")
        .arg(&program)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown bias"));
    Ok(())
}

#[test]
fn compile_missing_program_fails() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    dynapse()?
        .arg("compile")
        .arg(tmp.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading program"));
    Ok(())
}

#[test]
fn init_writes_loadable_config() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = tmp.path().join("dynapse").join("config.toml");

    dynapse()?.arg("init").arg(&config).assert().success();
    assert!(config.exists());

    // a second init refuses to clobber the file
    dynapse()?
        .arg("init")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    dynapse()?.args(["init", "--force"]).arg(&config).assert().success();

    dynapse()?
        .arg("--config")
        .arg(&config)
        .args(["neuron", "decompose", "1023"])
        .assert()
        .success()
        .stdout(predicate::str::contains("core 3"));
    Ok(())
}

#[test]
fn config_output_format_applies() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "output_format = \"json\"\n")?;

    let output = dynapse()?
        .arg("--config")
        .arg(&config)
        .args(["neuron", "decompose", "565"])
        .output()?;
    assert!(output.status.success());
    let parts: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parts["core"], 2);
    assert_eq!(parts["core_neuron"], 53);
    Ok(())
}

#[test]
fn config_sram_capacity_applies() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "[codec]\nsram_words = 16\n")?;

    dynapse()?
        .arg("--config")
        .arg(&config)
        .args(["burst", "--base", "15", "1", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
    Ok(())
}

#[test]
fn config_with_unusable_poisson_clock_is_rejected() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "[codec.poisson]\nclock_hz = 1e-30\n")?;

    dynapse()?
        .arg("--config")
        .arg(&config)
        .args(["rate", "100"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("16-bit rate register"));
    Ok(())
}
