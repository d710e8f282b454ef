use std::process::ExitCode;

use clap::{value_parser, Arg, ArgMatches, Command};
use mosaic::{
    config::{BLOCK_SIZE, DEFAULT_MAX_POOLS, MAX_CHAIN_BLOCKS, MAX_DYNAMIC_CAPACITY, MAX_TRANSFER_PAYLOAD_LEN},
    BlockAllocator, BlockPool, MosaicError, NodeId, PoolManager, Result, TransferBuffer,
    TransferBufferKey, TransferBufferManager, TransferType,
};

const SIM_POOL_BLOCKS: usize = 16;
const SIM_POOLS: usize = 2;
const SIM_BUFFER_SIZE: usize = 256;
const SIM_STATIC_SLOTS: usize = 2;
const SIM_DYNAMIC_SLOTS: usize = 4;

type SimManager<'a> =
    TransferBufferManager<'a, PoolManager<'a, SIM_POOLS>, SIM_BUFFER_SIZE, SIM_STATIC_SLOTS, SIM_DYNAMIC_SLOTS>;

/// Order in which frames of the simulated transfers arrive
#[derive(Debug, Clone, Copy)]
enum FrameOrder {
    /// Each transfer completes before the next starts
    Forward,
    /// Each transfer arrives last frame first
    Reverse,
    /// Round-robin across transfers, one frame at a time
    Interleaved,
}

impl FrameOrder {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "forward" => Ok(Self::Forward),
            "reverse" => Ok(Self::Reverse),
            "interleaved" => Ok(Self::Interleaved),
            _ => Err(MosaicError::invalid_parameter(
                "order",
                "Order must be forward, reverse or interleaved",
            )),
        }
    }
}

/// One simulated transfer and the payload it must reassemble to
struct SimTransfer {
    key: TransferBufferKey,
    payload: Vec<u8>,
    accepted: bool,
}

impl SimTransfer {
    fn expected(&self) -> &[u8] {
        &self.payload[..self.payload.len().min(SIM_BUFFER_SIZE)]
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let matches = Command::new("mosaic-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mosaic transfer reassembly buffer tool")
        .subcommand_required(true)
        .subcommand(
            Command::new("simulate")
                .about("Reassemble generated multi-frame transfers through the buffer manager")
                .arg(
                    Arg::new("transfers")
                        .short('t')
                        .long("transfers")
                        .value_name("COUNT")
                        .help("Number of concurrent transfers")
                        .value_parser(value_parser!(usize))
                        .default_value("6"),
                )
                .arg(
                    Arg::new("payload_len")
                        .short('p')
                        .long("payload-len")
                        .value_name("BYTES")
                        .help("Payload length of each transfer")
                        .value_parser(value_parser!(usize))
                        .default_value("200"),
                )
                .arg(
                    Arg::new("frame_len")
                        .short('f')
                        .long("frame-len")
                        .value_name("BYTES")
                        .help("Payload bytes carried per frame")
                        .value_parser(value_parser!(usize))
                        .default_value("7"),
                )
                .arg(
                    Arg::new("order")
                        .short('o')
                        .long("order")
                        .value_name("ORDER")
                        .help("Frame arrival order")
                        .value_parser(["forward", "reverse", "interleaved"])
                        .default_value("interleaved"),
                ),
        )
        .subcommand(Command::new("info").about("Show build configuration"))
        .get_matches();

    match matches.subcommand() {
        Some(("simulate", sim_matches)) => handle_simulate(sim_matches),
        Some(("info", _)) => {
            handle_info();
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            println!("Use '--help' for usage information");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn usize_arg(matches: &ArgMatches, name: &'static str) -> Result<usize> {
    matches
        .get_one::<usize>(name)
        .copied()
        .ok_or(MosaicError::invalid_parameter(name, "Missing value"))
}

fn handle_simulate(matches: &ArgMatches) -> Result<ExitCode> {
    let transfers = usize_arg(matches, "transfers")?;
    let payload_len = usize_arg(matches, "payload_len")?;
    let frame_len = usize_arg(matches, "frame_len")?;
    let order = matches
        .get_one::<String>("order")
        .map(String::as_str)
        .map_or(Ok(FrameOrder::Interleaved), FrameOrder::parse)?;

    if transfers == 0 || transfers > usize::from(NodeId::MAX) {
        return Err(MosaicError::invalid_parameter("transfers", "Transfers must be in 1..=127"));
    }
    if payload_len == 0 || frame_len == 0 {
        return Err(MosaicError::invalid_parameter(
            "payload_len",
            "Payload and frame length must be non-zero",
        ));
    }

    println!("Simulating {} transfers of {} bytes in {}-byte frames ({:?})", transfers, payload_len, frame_len, order);
    println!(
        "  Manager: {} static + {} dynamic slots of {} bytes",
        SIM_STATIC_SLOTS, SIM_DYNAMIC_SLOTS, SIM_BUFFER_SIZE
    );
    println!("  Pools: {} x {} blocks of {} bytes", SIM_POOLS, SIM_POOL_BLOCKS, BLOCK_SIZE);

    let pool_a = BlockPool::<SIM_POOL_BLOCKS>::new();
    let pool_b = BlockPool::<SIM_POOL_BLOCKS>::new();
    let mut poolmgr = PoolManager::<SIM_POOLS>::new();
    poolmgr.add_pool(&pool_a)?;
    poolmgr.add_pool(&pool_b)?;

    let mut mgr = SimManager::new(&poolmgr);
    let mut sims = Vec::with_capacity(transfers);

    for index in 0..transfers {
        let node = NodeId::try_from(index as u8 + 1)?;
        let key = TransferBufferKey::new(node, TransferType::MessageBroadcast);
        let payload = (0..payload_len)
            .map(|i| (i as u8).wrapping_mul(7).wrapping_add(node.get()))
            .collect();

        let accepted = match mgr.create(key) {
            Ok(_) => true,
            Err(e) if e.is_backpressure() => {
                println!("  Dropped {}: {}", key, e);
                false
            }
            Err(e) => return Err(e),
        };
        sims.push(SimTransfer { key, payload, accepted });
    }

    let frames = schedule(sims.len(), payload_len, frame_len, order);
    let mut truncated = 0;
    for (index, offset, len) in &frames {
        let sim = &sims[*index];
        let Some(mut buf) = mgr.access(sim.key) else {
            continue;
        };
        if buf.write(*offset, &sim.payload[*offset..*offset + *len]) < *len {
            truncated += 1;
        }
    }

    println!("\nAfter {} frames ({} truncated):", frames.len(), truncated);
    print_state(&mgr, &poolmgr);

    let mut mismatches = verify(&mut mgr, &sims);

    println!("\nRemoving transfers:");
    for sim in sims.iter().filter(|sim| sim.accepted) {
        mgr.remove(sim.key);
        print!("  - {}: ", sim.key);
        print_state(&mgr, &poolmgr);
        mismatches += verify(&mut mgr, &sims);
    }

    println!("\nPool stats: {}", poolmgr.stats().summary());

    if mismatches > 0 {
        println!("FAILED: {} payload mismatches", mismatches);
        return Ok(ExitCode::FAILURE);
    }

    println!("OK: every accepted transfer reassembled intact");
    Ok(ExitCode::SUCCESS)
}

/// Frame arrival schedule as (transfer index, offset, length)
fn schedule(transfers: usize, payload_len: usize, frame_len: usize, order: FrameOrder) -> Vec<(usize, usize, usize)> {
    let offsets: Vec<(usize, usize)> = (0..payload_len)
        .step_by(frame_len)
        .map(|offset| (offset, frame_len.min(payload_len - offset)))
        .collect();

    match order {
        FrameOrder::Forward => (0..transfers)
            .flat_map(|t| offsets.iter().map(move |&(offset, len)| (t, offset, len)))
            .collect(),
        FrameOrder::Reverse => (0..transfers)
            .flat_map(|t| offsets.iter().rev().map(move |&(offset, len)| (t, offset, len)))
            .collect(),
        FrameOrder::Interleaved => offsets
            .iter()
            .flat_map(|&(offset, len)| (0..transfers).map(move |t| (t, offset, len)))
            .collect(),
    }
}

/// Check every transfer still bound against its payload; returns the mismatch count
fn verify(mgr: &mut SimManager<'_>, sims: &[SimTransfer]) -> usize {
    let mut mismatches = 0;
    for sim in sims {
        let Some(buf) = mgr.access(sim.key) else {
            continue;
        };

        let expected = sim.expected();
        let mut out = vec![0u8; expected.len() + 1];
        let len = buf.read(0, &mut out);
        if len != expected.len() || out[..len] != *expected {
            log::error!("{} reassembled {} bytes, expected {}", sim.key, len, expected.len());
            mismatches += 1;
        }
    }
    mismatches
}

fn print_state(mgr: &SimManager<'_>, poolmgr: &PoolManager<'_, SIM_POOLS>) {
    let stats = mgr.stats();
    println!(
        "static {}/{}, dynamic {}/{}, pool blocks {}/{}",
        stats.static_in_use,
        stats.static_capacity,
        stats.dynamic_in_use,
        stats.dynamic_capacity,
        poolmgr.used_blocks(),
        poolmgr.total_blocks()
    );
}

fn handle_info() {
    println!("mosaic {}", mosaic::VERSION);
    println!("\nConfiguration:");
    println!("  Block size: {} bytes", BLOCK_SIZE);
    println!("  Max transfer payload: {} bytes", MAX_TRANSFER_PAYLOAD_LEN);
    println!("  Max blocks per dynamic buffer: {}", MAX_CHAIN_BLOCKS);
    println!("  Max dynamic buffer capacity: {} bytes", MAX_DYNAMIC_CAPACITY);
    println!("  Default pools per manager: {}", DEFAULT_MAX_POOLS);
}
