//! `ember`: a thin command-line client for an `ember-node` HTTP API.
//!
//! Wallet generation and transaction signing happen locally (wallets are
//! never node-side state); everything else is a JSON request against the
//! node named by `--node-url` / `NODE_URL`.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use ember_core::types::Amount;
use ember_wallet::Wallet;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Command-line client for an ember-node", version)]
struct Cli {
    /// Base URL of the node to talk to.
    #[arg(long, env = "NODE_URL", default_value = "http://localhost:5000", global = true)]
    node_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet operations (local — no node contacted).
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Sign and submit a transaction.
    Send {
        /// Hex-encoded private key of the sender.
        #[arg(long)]
        private_key: String,
        /// Recipient address.
        #[arg(long)]
        to: String,
        /// Amount to transfer.
        #[arg(long)]
        amount: f64,
    },
    /// Trigger a mine on the node.
    Mine {
        /// Address to receive the block reward, if any.
        #[arg(long)]
        miner_address: Option<String>,
    },
    /// Print the node's chain.
    Chain,
    /// Print the node's pending pool.
    Pending,
    /// Print the balance of an address.
    Balance {
        address: String,
    },
    /// Peer registry operations.
    Nodes {
        #[command(subcommand)]
        action: NodesAction,
    },
}

#[derive(Subcommand)]
enum WalletAction {
    /// Generate a fresh keypair and print it.
    New,
}

#[derive(Subcommand)]
enum NodesAction {
    /// Register one or more peer URLs with the node.
    Register {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// List the node's registered peers.
    List,
    /// Trigger the node's longest-valid-chain sweep.
    Resolve,
}

fn unix_timestamp() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs_f64()
}

fn main() {
    let cli = Cli::parse();
    let client = reqwest::blocking::Client::new();

    let result = match cli.command {
        Commands::Wallet { action: WalletAction::New } => wallet_new(),
        Commands::Send { private_key, to, amount } => send(&client, &cli.node_url, &private_key, &to, amount),
        Commands::Mine { miner_address } => mine(&client, &cli.node_url, miner_address),
        Commands::Chain => chain(&client, &cli.node_url),
        Commands::Pending => pending(&client, &cli.node_url),
        Commands::Balance { address } => balance(&client, &cli.node_url, &address),
        Commands::Nodes { action: NodesAction::Register { urls } } => nodes_register(&client, &cli.node_url, urls),
        Commands::Nodes { action: NodesAction::List } => nodes_list(&client, &cli.node_url),
        Commands::Nodes { action: NodesAction::Resolve } => nodes_resolve(&client, &cli.node_url),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn wallet_new() -> Result<(), String> {
    let wallet = Wallet::generate();
    println!(
        "{}",
        serde_json::json!({
            "private_key": wallet.private_key_hex(),
            "public_key": wallet.public_key_hex(),
            "address": wallet.address(),
        })
    );
    Ok(())
}

fn send(client: &reqwest::blocking::Client, node_url: &str, private_key_hex: &str, to: &str, amount: f64) -> Result<(), String> {
    let wallet = Wallet::from_private_key_hex(private_key_hex).ok_or("invalid private key hex")?;
    let timestamp = unix_timestamp();
    let amount = Amount::from_f64(amount);
    let signature = wallet.sign_transfer(to, &amount, timestamp);

    let body = serde_json::json!({
        "sender_pubkey": wallet.public_key_hex(),
        "recipient_address": to,
        "amount": amount,
        "signature": signature,
        "timestamp": timestamp,
    });

    print_response(client.post(format!("{node_url}/transaction/new")).json(&body).send())
}

fn mine(client: &reqwest::blocking::Client, node_url: &str, miner_address: Option<String>) -> Result<(), String> {
    let mut request = client.get(format!("{node_url}/mine"));
    if let Some(miner_address) = miner_address {
        request = request.query(&[("miner_address", miner_address)]);
    }
    print_response(request.send())
}

fn chain(client: &reqwest::blocking::Client, node_url: &str) -> Result<(), String> {
    print_response(client.get(format!("{node_url}/chain")).send())
}

fn pending(client: &reqwest::blocking::Client, node_url: &str) -> Result<(), String> {
    print_response(client.get(format!("{node_url}/pending")).send())
}

fn balance(client: &reqwest::blocking::Client, node_url: &str, address: &str) -> Result<(), String> {
    print_response(client.get(format!("{node_url}/balance/{address}")).send())
}

fn nodes_register(client: &reqwest::blocking::Client, node_url: &str, urls: Vec<String>) -> Result<(), String> {
    let body = serde_json::json!({ "nodes": urls });
    print_response(client.post(format!("{node_url}/nodes/register")).json(&body).send())
}

fn nodes_list(client: &reqwest::blocking::Client, node_url: &str) -> Result<(), String> {
    print_response(client.get(format!("{node_url}/nodes")).send())
}

fn nodes_resolve(client: &reqwest::blocking::Client, node_url: &str) -> Result<(), String> {
    print_response(client.get(format!("{node_url}/nodes/resolve")).send())
}

fn print_response(response: reqwest::Result<reqwest::blocking::Response>) -> Result<(), String> {
    let response = response.map_err(|e| e.to_string())?;
    let status = response.status();
    let body: serde_json::Value = response.json().map_err(|e| e.to_string())?;
    println!("{body}");
    if !status.is_success() {
        return Err(format!("node returned {status}"));
    }
    Ok(())
}
