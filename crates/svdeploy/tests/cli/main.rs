use snapbox::{cmd::Command, str};
use std::{fs, path::Path};

const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Variables that would otherwise leak into the command's settings.
const ENV: &[&str] = &[
    "CHAIN",
    "ETH_FROM",
    "ETH_GAS_LIMIT",
    "ETH_GAS_PRICE",
    "ETH_KEYSTORE",
    "ETH_PASSWORD",
    "ETH_PRIORITY_GAS_PRICE",
    "ETH_PRIVATE_KEY",
    "ETH_RPC_URL",
    "ETH_TIMEOUT",
    "RUST_LOG",
    "SVDEPLOY_DEBUG",
    "SVDEPLOY_NETWORK",
];

fn svdeploy(root: &Path) -> Command {
    let mut cmd = Command::new(snapbox::cmd::cargo_bin!("svdeploy")).current_dir(root);
    for var in ENV {
        cmd = cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1")
}

fn write_artifact(root: &Path) {
    let dir = root.join("artifacts/contracts/SimpleVoting.sol");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("SimpleVoting.json"),
        r#"{"contractName":"SimpleVoting","sourceName":"contracts/SimpleVoting.sol","abi":[],"bytecode":"0x6080604052","linkReferences":{}}"#,
    )
    .unwrap();
}

#[test]
fn prints_help() {
    let tmp = tempfile::tempdir().unwrap();
    svdeploy(tmp.path()).arg("--help").assert().success().stdout_eq(str![[r#"
Deploy a compiled contract and print its address[..]

Usage: svdeploy[..] [OPTIONS] [CONTRACT]
...
"#]]);
}

#[test]
fn missing_artifacts_exit_with_error() {
    let tmp = tempfile::tempdir().unwrap();
    svdeploy(tmp.path())
        .args(["--private-key", DEV_KEY])
        .assert()
        .code(1)
        .stdout_eq(str![[r#"
Deploying SimpleVoting contract...

"#]])
        .stderr_eq(str![[r#"
Error: failed to get contract factory for SimpleVoting

Context:
- artifacts directory [..] does not exist, compile the contracts first

"#]]);
}

#[test]
fn unreachable_network_exits_with_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_artifact(tmp.path());
    svdeploy(tmp.path())
        .args(["--rpc-url", "http://127.0.0.1:1", "--private-key", DEV_KEY])
        .assert()
        .code(1)
        .stdout_eq(str![[r#"
Deploying SimpleVoting contract...

"#]])
        .stderr_eq(str![[r#"
Error: failed to get contract factory for SimpleVoting

Context:
- Error #0: failed to connect to network localhost at http://127.0.0.1:1
...
"#]]);
}

#[test]
fn missing_signer_exits_with_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_artifact(tmp.path());
    svdeploy(tmp.path()).assert().code(1).stdout_eq(str![""]).stderr_eq(str![[r#"
Error: No signer configured, pass one of --private-key, --mnemonic or --keystore, or --unlocked with --from

"#]]);
}

#[test]
fn unknown_network_from_config_exits_with_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_artifact(tmp.path());
    fs::write(tmp.path().join("svdeploy.toml"), "network = \"sepolia\"\n").unwrap();
    svdeploy(tmp.path())
        .args(["--private-key", DEV_KEY])
        .assert()
        .code(1)
        .stderr_eq(str![[r#"
Error: unknown network "sepolia", known networks: hardhat, localhost

"#]]);
}

#[test]
fn dotenv_provides_private_key() {
    let tmp = tempfile::tempdir().unwrap();
    write_artifact(tmp.path());
    fs::write(tmp.path().join(".env"), format!("ETH_PRIVATE_KEY={DEV_KEY}\n")).unwrap();
    svdeploy(tmp.path())
        .args(["--rpc-url", "http://127.0.0.1:1"])
        .assert()
        .code(1)
        .stdout_eq(str![[r#"
Deploying SimpleVoting contract...

"#]])
        .stderr_eq(str![[r#"
Error: failed to get contract factory for SimpleVoting

Context:
- Error #0: failed to connect to network localhost at http://127.0.0.1:1
...
"#]]);
}

#[test]
fn dotenv_is_read_from_root_arg() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path().join("project");
    write_artifact(&project);
    fs::write(project.join(".env"), format!("ETH_PRIVATE_KEY={DEV_KEY}\nETH_RPC_URL=http://127.0.0.1:1\n"))
        .unwrap();
    svdeploy(tmp.path())
        .args(["--root", project.to_str().unwrap(), "contracts/SimpleVoting.sol:SimpleVoting"])
        .assert()
        .code(1)
        .stdout_eq(str![[r#"
Deploying SimpleVoting contract...

"#]])
        .stderr_eq(str![[r#"
Error: failed to get contract factory for contracts/SimpleVoting.sol:SimpleVoting

Context:
- Error #0: failed to connect to network localhost at http://127.0.0.1:1
...
"#]]);
}

#[test]
fn unlocked_conflicts_with_private_key() {
    let tmp = tempfile::tempdir().unwrap();
    svdeploy(tmp.path())
        .args([
            "--unlocked",
            "--from",
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "--private-key",
            DEV_KEY,
        ])
        .assert()
        .code(2)
        .stdout_eq(str![""])
        .stderr_eq(str![[r#"
error: the argument [..] cannot be used with [..]
...
"#]]);
}
