//! Adventure generator - builds a playable adventure from an action

use crate::domain::entities::{Adventure, AdventureAction, AdventureKind, AdventureType, Dungeon, Monster, Shift};
use crate::domain::error::GameError;
use crate::domain::services::SimpleCombat;

/// Create the adventure described by `action`, laid out from `shift`
pub fn create(shift: &Shift, action: AdventureAction) -> Result<Adventure, GameError> {
    let kind = match action.adventure_type {
        AdventureType::TestRoom => {
            AdventureKind::TestEncounter(SimpleCombat::new(vec![Monster::rat(), Monster::rat()]))
        }
        AdventureType::Dungeon => AdventureKind::DungeonCrawl(Dungeon::generate(shift)?),
        other => return Err(GameError::UnsupportedAdventureType(other)),
    };
    Ok(Adventure::new(action, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AdventureState, DifficultyType};
    use crate::test_support::history;

    fn action(adventure_type: AdventureType) -> AdventureAction {
        AdventureAction::new(adventure_type, DifficultyType::Easy, 1).unwrap()
    }

    #[test]
    fn test_test_room_has_two_rats() {
        let shifts = history(100, 100);
        let adventure = create(&shifts[&100], action(AdventureType::TestRoom)).unwrap();

        assert_eq!(adventure.state, AdventureState::Creation);
        match adventure.kind {
            AdventureKind::TestEncounter(combat) => assert_eq!(combat.monsters().len(), 2),
            other => panic!("unexpected adventure kind {other:?}"),
        }
    }

    #[test]
    fn test_dungeon_crawl() {
        let shifts = history(100, 100);
        let adventure = create(&shifts[&100], action(AdventureType::Dungeon)).unwrap();
        assert!(matches!(adventure.kind, AdventureKind::DungeonCrawl(_)));
    }

    #[test]
    fn test_unsupported_types() {
        let shifts = history(100, 100);
        for adventure_type in [AdventureType::Battle, AdventureType::Quest] {
            assert_eq!(
                create(&shifts[&100], action(adventure_type)).unwrap_err(),
                GameError::UnsupportedAdventureType(adventure_type)
            );
        }
    }
}
