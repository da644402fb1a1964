use std::process::Command;

fn main() {
    // CONFIX_VERSION wins when set by a release build; otherwise ask git.
    if let Ok(version) = std::env::var("CONFIX_VERSION") {
        println!("cargo:rustc-env=CONFIX_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=CONFIX_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=CONFIX_VERSION");
}
