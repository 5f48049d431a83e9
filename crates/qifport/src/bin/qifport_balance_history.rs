//! qifport-balance-history - Reconstruct the daily balance of one account.

fn main() -> std::process::ExitCode {
    qifport::cmd::balance_history::main()
}
