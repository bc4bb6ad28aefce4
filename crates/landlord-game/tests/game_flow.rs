//! Whole-game scenarios driven through the public `Board` API.

use landlord_game::{
    standard_deck, Board, GameError, GameRules, PlayerId, RandomDice, ScriptedDice, Slot,
    TradeBundle, TradeRequest,
};

fn board_with_rolls(rolls: &[u32]) -> Board {
    let slots = vec![
        Slot::neutral("Go"),
        Slot::property("Mediterranean Avenue", 60, [2, 10, 30, 90, 160], 50),
        Slot::property("Baltic Avenue", 60, [4, 20, 60, 180, 320], 50),
        Slot::card("Chance"),
        Slot::tax("Income Tax", 200),
        Slot::jail("Jail"),
        Slot::neutral("Free Parking"),
    ];
    Board::new(
        slots,
        standard_deck(),
        GameRules::default(),
        Box::new(ScriptedDice::new(rolls.iter().copied()).with_fallback(6)),
    )
}

fn offer(
    requester: PlayerId,
    responder: PlayerId,
    give: TradeBundle,
    take: TradeBundle,
) -> TradeRequest {
    TradeRequest {
        requester: Some(requester),
        id: Some(0),
        responder: Some(responder),
        give,
        take,
    }
}

/// Rolls, buys whatever `who` landed on, and ends the turn.
fn buy_with_roll(board: &mut Board, who: PlayerId) {
    board.roll_and_move(who).unwrap();
    board.buy_property(who).unwrap();
    board.end_turn(who).unwrap();
}

#[test]
fn buy_then_pay_rent() {
    let mut board = board_with_rolls(&[1, 1]);
    let a = board.add_player("Player-1").id;
    let b = board.add_player("Player-2").id;

    let outcome = board.roll_and_move(a).unwrap();
    assert_eq!(
        outcome.prompt.as_deref(),
        Some("Want to buy Mediterranean Avenue for 60?")
    );
    board.buy_property(a).unwrap();
    assert_eq!(board.player(a).unwrap().balance, 1440);
    board.end_turn(a).unwrap();

    board.roll_and_move(b).unwrap();
    assert_eq!(board.player(a).unwrap().balance, 1442);
    assert_eq!(board.player(b).unwrap().balance, 1498);
}

#[test]
fn only_current_player_may_act() {
    let mut board = board_with_rolls(&[1]);
    let a = board.add_player("Player-1").id;
    let b = board.add_player("Player-2").id;

    assert_eq!(board.roll_and_move(b), Err(GameError::NotCurrentTurn));
    assert_eq!(board.end_turn(b), Err(GameError::NotCurrentTurn));
    assert_eq!(board.buy_property(b), Err(GameError::NotCurrentTurn));
    assert_eq!(board.end_turn(a), Err(GameError::TurnObligationsPending));
    assert_eq!(board.current_player().unwrap().id, a);
}

#[test]
fn proposing_someone_elses_property_is_rejected() {
    let mut board = board_with_rolls(&[1]);
    let a = board.add_player("Player-1").id;
    let b = board.add_player("Player-2").id;
    buy_with_roll(&mut board, a);

    // Bob offers ada's property as if it were his.
    let give = TradeBundle { property: vec![1], ..Default::default() };
    let result = board.propose_trade(b, offer(b, a, give, TradeBundle::default()));
    assert_eq!(result, Err(GameError::NotOwner));
    assert!(board.trades().is_empty());
    assert!(board.history().is_empty());
}

#[test]
fn stale_trade_rolls_back_when_property_moved() {
    let mut board = board_with_rolls(&[1]);
    let a = board.add_player("Player-1").id;
    let b = board.add_player("Player-2").id;
    let c = board.add_player("Player-3").id;
    buy_with_roll(&mut board, a);

    let give = TradeBundle { property: vec![1], ..Default::default() };
    board
        .propose_trade(a, offer(a, b, give.clone(), TradeBundle { money: 100, ..Default::default() }))
        .unwrap();
    board
        .propose_trade(a, offer(a, c, give, TradeBundle { money: 50, ..Default::default() }))
        .unwrap();

    board.accept_trade(c, 1).unwrap();
    assert_eq!(board.slots()[1].as_property().unwrap().owner, Some(c));

    // Bob's money leg applies first, then the property leg fails.
    assert_eq!(board.accept_trade(b, 0), Err(GameError::NotOwner));
    assert_eq!(board.player(a).unwrap().balance, 1440 + 50);
    assert_eq!(board.player(b).unwrap().balance, 1500);
    assert_eq!(board.player(c).unwrap().balance, 1450);
    assert_eq!(board.slots()[1].as_property().unwrap().owner, Some(c));
    assert!(board.trades()[0].active);
}

#[test]
fn forfeit_returns_properties_and_passes_turn() {
    let mut board = board_with_rolls(&[1]);
    let a = board.add_player("Player-1").id;
    let b = board.add_player("Player-2").id;
    board.roll_and_move(a).unwrap();
    board.buy_property(a).unwrap();

    let outcome = board.remove_player(a).unwrap();
    let text = outcome.broadcast.unwrap();
    assert!(text.contains("Player-1 has been removed from the game"));
    assert!(text.contains("Waiting for Player-2 to play"));
    assert_eq!(board.slots()[1].as_property().unwrap().owner, None);
    assert_eq!(board.current_player().unwrap().id, b);
}

#[test]
fn random_play_keeps_books_consistent() {
    let mut board = Board::standard(GameRules::default(), Box::new(RandomDice::seeded(2024)));
    let ids: Vec<PlayerId> = (1..=4)
        .map(|n| board.add_player(format!("Player-{n}")).id)
        .collect();

    for round in 0..400 {
        let current = board.current_player().unwrap().id;
        let _ = board.roll_and_move(current);
        if round % 3 != 0 {
            let _ = board.buy_property(current);
        }
        let _ = board.decline_purchase(current);
        let _ = board.settle_debt(current);

        if board.end_turn(current).is_err() {
            // Stuck on an unpayable debt: the player forfeits.
            board.remove_player(current).unwrap();
            if board.players().len() < 2 {
                break;
            }
        }

        for player in board.players() {
            assert!(player.balance >= 0, "{} went negative", player.name);
        }
        for slot in board.slots() {
            if let Some(owner) = slot.as_property().and_then(|p| p.owner) {
                assert!(board.player(owner).is_some(), "{} owned by a ghost", slot.name);
            }
        }
    }
    assert!(board.players().iter().all(|p| ids.contains(&p.id)));
}
