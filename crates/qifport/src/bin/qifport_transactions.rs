//! qifport-transactions - Export QIF transactions for budgeting tools.

fn main() -> std::process::ExitCode {
    qifport::cmd::transactions::main()
}
