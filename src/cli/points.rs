//! Increment command implementation

use anyhow::Result;
use std::path::Path;

use beltboard::LinkParams;

use super::{open_board, parse_pairs};

/// Add points to a user's pool.
///
/// `link` holds the award's identifying fields (`id`, `linkId`, `org`, ...).
/// With `once`, the award is applied only the first time that key is seen.
pub async fn increment_command(
    data: Option<&Path>,
    config: Option<&Path>,
    user: &str,
    pool: &str,
    points: i64,
    link: &[String],
    once: Option<&str>,
) -> Result<()> {
    let link = LinkParams::from_pairs(parse_pairs(link)?);
    let (_, board) = open_board(data, config);

    if let Some(key) = once {
        if !board.claim_once(key) {
            println!("Already awarded: {}", key);
            return Ok(());
        }
    }

    let value = board.increment(user, pool, points, &link)?;
    let promoted = board.refresh_levels();
    board.persist()?;

    println!("{}.{} = {}", user, pool, value);
    for id in promoted {
        println!("Level up: {}", id);
    }
    Ok(())
}
