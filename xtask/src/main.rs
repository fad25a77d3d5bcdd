// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::process::Command as StdCommand;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
struct Command {
    #[clap(subcommand)]
    sub: SubCommand,
}

impl Command {
    fn run(self) -> Result<(), String> {
        match self.sub {
            SubCommand::Build(cmd) => cmd.run(),
            SubCommand::Lint(cmd) => cmd.run(),
            SubCommand::Test(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum SubCommand {
    #[clap(about = "Compile workspace packages.")]
    Build(CommandBuild),
    #[clap(about = "Run format and clippy checks.")]
    Lint(CommandLint),
    #[clap(about = "Run unit, integration and doc tests.")]
    Test(CommandTest),
}

#[derive(Parser)]
struct CommandBuild {
    #[arg(long, help = "Assert that `Cargo.lock` will remain unchanged.")]
    locked: bool,
}

impl CommandBuild {
    fn run(self) -> Result<(), String> {
        let mut cmd = find_command("cargo")?;
        cmd.args(["build", "--workspace", "--all-features", "--tests"]);
        if self.locked {
            cmd.arg("--locked");
        }
        run_command(cmd)
    }
}

#[derive(Parser)]
struct CommandLint {
    #[arg(long, help = "Automatically apply lint suggestions.")]
    fix: bool,
}

impl CommandLint {
    fn run(self) -> Result<(), String> {
        run_command(make_format_cmd(self.fix)?)?;
        run_command(make_clippy_cmd(self.fix)?)
    }
}

#[derive(Parser)]
struct CommandTest {
    #[arg(long, help = "Run tests serially and do not capture output.")]
    no_capture: bool,
}

impl CommandTest {
    fn run(self) -> Result<(), String> {
        let mut cmd = find_command("cargo")?;
        cmd.args(["test", "--workspace", "--all-features"]);
        if self.no_capture {
            cmd.args(["--", "--nocapture", "--test-threads=1"]);
        }
        run_command(cmd)
    }
}

fn make_format_cmd(fix: bool) -> Result<StdCommand, String> {
    let mut cmd = find_command("cargo")?;
    cmd.args(["fmt", "--all"]);
    if !fix {
        cmd.arg("--check");
    }
    Ok(cmd)
}

fn make_clippy_cmd(fix: bool) -> Result<StdCommand, String> {
    let mut cmd = find_command("cargo")?;
    cmd.args(["clippy", "--tests", "--all-features", "--all-targets", "--workspace"]);
    if fix {
        cmd.args(["--allow-staged", "--allow-dirty", "--fix"]);
    } else {
        cmd.args(["--", "-D", "warnings"]);
    }
    Ok(cmd)
}

fn find_command(name: &str) -> Result<StdCommand, String> {
    let exe = which::which(name).map_err(|err| format!("{name} not found: {err}"))?;
    let mut cmd = StdCommand::new(exe);
    cmd.current_dir(env!("CARGO_WORKSPACE_DIR"));
    Ok(cmd)
}

fn run_command(mut cmd: StdCommand) -> Result<(), String> {
    println!("{cmd:?}");
    let status = cmd
        .status()
        .map_err(|err| format!("failed to run {cmd:?}: {err}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("{cmd:?} exited with {status}"))
    }
}

fn main() -> ExitCode {
    match Command::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
