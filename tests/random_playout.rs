use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use chess_rules::{Color, Game, Move, PieceType, Position};

const PLIES: usize = 80;

/// Legal moves in a fixed order so a seeded game is reproducible.
fn sorted_legal_moves(game: &Game) -> Vec<Move> {
    let mut moves: Vec<Move> = game.legal_moves().into_iter().collect();
    moves.sort_by_key(|m| (m.start(), m.end(), m.promotion().map(|k| k.to_string())));
    moves
}

fn play_random_game(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new();

    for _ in 0..PLIES {
        let mover = game.turn();
        let moves = sorted_legal_moves(&game);
        if moves.is_empty() {
            assert!(game.is_in_checkmate(mover) || game.is_in_stalemate(mover));
            return;
        }
        assert!(!game.is_in_checkmate(mover));
        assert!(!game.is_in_stalemate(mover));

        // A move to an own-occupied square is never legal and never mutates
        let before = game.clone();
        let bogus = Move::new(moves[0].start(), moves[0].start(), None);
        assert!(game.make_move(&bogus).is_err());
        assert_eq!(game, before);

        let rights_before = game.castling_rights();
        let chosen = moves[(rng.next_u64() % moves.len() as u64) as usize];
        let moved_piece = game.board().get(chosen.start()).unwrap();
        game.make_move(&chosen).unwrap();

        assert!(!game.is_in_check(mover), "{} left {} in check", chosen, mover);
        assert_eq!(game.turn(), mover.opponent());

        // Castling flags only ever go from false to true
        for color in [Color::White, Color::Black] {
            let after = game.castling_rights();
            assert!(after.king_moved(color) || !rights_before.king_moved(color));
            assert!(after.kingside_rook_moved(color) || !rights_before.kingside_rook_moved(color));
            assert!(after.queenside_rook_moved(color) || !rights_before.queenside_rook_moved(color));
        }

        let double_push = moved_piece.kind() == PieceType::Pawn
            && (chosen.end().row() - chosen.start().row()).abs() == 2;
        if double_push {
            let skipped = Position::new((chosen.start().row() + chosen.end().row()) / 2, chosen.start().col()).unwrap();
            assert_eq!(game.en_passant_target(), Some(skipped));
        } else {
            assert_eq!(game.en_passant_target(), None);
        }
    }
}

#[test]
fn random_games_keep_every_invariant() {
    for seed in [1, 2, 3, 0xDEADBEEFCAFEBABE] {
        play_random_game(seed);
    }
}
