use std::time::Instant;

use eyre::bail;
use proofkit::constants::PROOF_PREVIEW_BYTES;
use proofkit::{open_session, DigestBackend};
use tracing::info;

pub fn main() -> eyre::Result<()> {
    proofkit::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let inputs = match args.as_slice() {
        [] => vec!["3".to_string(), "4".to_string()],
        [a, b] => vec![a.clone(), b.clone()],
        _ => bail!("usage: multiplier2 [a b]"),
    };

    let session = open_session(DigestBackend)?;

    let now = Instant::now();
    let proof = session.generate(&inputs)?;
    info!("Prover runtime: {} s", now.elapsed().as_secs_f64());
    info!("Proof:\n{}", proof.hex_preview(PROOF_PREVIEW_BYTES));

    let now = Instant::now();
    let valid = session.verify(None)?;
    info!("Verifier runtime: {} s", now.elapsed().as_secs_f64());
    info!("Proof is Valid: {valid}");

    Ok(())
}
