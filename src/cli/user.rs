//! User commands: register, update-user, set-points, missing

use anyhow::Result;
use std::path::Path;

use super::{open_board, parse_pairs, print_json};

pub async fn register_command(
    data: Option<&Path>,
    config: Option<&Path>,
    id: &str,
    name: Option<String>,
    geo: Option<String>,
    attributes: &[String],
) -> Result<()> {
    let attributes = parse_pairs(attributes)?;
    let (_, board) = open_board(data, config);

    board.register_user(id, name, geo, attributes)?;
    board.persist()?;
    println!("Registered {}", id);
    Ok(())
}

/// Self-service property update (display name and `*Id` keys only)
pub async fn update_user_command(
    data: Option<&Path>,
    config: Option<&Path>,
    id: &str,
    values: &[String],
) -> Result<()> {
    let values = parse_pairs(values)?;
    let (_, board) = open_board(data, config);

    let changed = board.update_user(id, &values)?;
    if changed > 0 {
        board.persist()?;
    }
    println!("{} propert{} changed", changed, if changed == 1 { "y" } else { "ies" });
    Ok(())
}

/// Administrative edit of pool points and properties
pub async fn set_points_command(
    data: Option<&Path>,
    config: Option<&Path>,
    id: &str,
    values: &[String],
) -> Result<()> {
    let values = parse_pairs(values)?;
    let (_, board) = open_board(data, config);

    let changed = board.set_scorecard_fields(id, &values)?;
    if changed > 0 {
        board.persist()?;
    }
    print_json(&board.scorecard(id)?)
}

/// Users missing an external id attribute
pub async fn missing_command(
    data: Option<&Path>,
    config: Option<&Path>,
    attribute: &str,
) -> Result<()> {
    let (_, board) = open_board(data, config);
    print_json(&board.users_missing_attribute(attribute))
}
