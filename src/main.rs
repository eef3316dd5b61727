use storage_cli::{dispatch::Dispatcher, gcs::StorageClient};

fn main() {
    let dispatcher = Dispatcher::default();
    let code = dispatcher.run(
        std::env::args_os(),
        &mut std::io::stdout().lock(),
        StorageClient::connect,
    );

    std::process::exit(code);
}
