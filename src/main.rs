mod cli;
mod runner;

#[tokio::main]
async fn main() {
    let cli = cli::parse_cli();
    let code = match runner::run_from_cli(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("[-] {:#}", e);
            1
        }
    };
    // A cancelled wordlist read can leave a blocking reader behind that
    // would keep runtime shutdown waiting, so exit without dropping it.
    std::process::exit(code);
}
