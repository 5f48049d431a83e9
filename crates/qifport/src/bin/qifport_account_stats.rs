//! qifport-account-stats - List accounts in a QIF file.

fn main() -> std::process::ExitCode {
    qifport::cmd::account_stats::main()
}
