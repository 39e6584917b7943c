//! 测试用的牌局构造工具

use crate::card::{full_deck, mask_of, Card, Deck, Rank, Suit};
use crate::rules::{Rules, HAND_SIZE};
use crate::state::{GameSession, Seat};
use uuid::Uuid;

/// 解析 "AS 10H KD 7C" 这样的简写，最后一个字符是花色
pub fn parse_cards(text: &str) -> Vec<Card> {
    text.split_whitespace()
        .map(|token| {
            let (rank, suit) = token.split_at(token.len() - 1);
            let suit = match suit {
                "S" => Suit::Spades,
                "H" => Suit::Hearts,
                "D" => Suit::Diamonds,
                "C" => Suit::Clubs,
                other => panic!("未知花色 {other}"),
            };
            let rank = match rank {
                "A" => Rank::Ace,
                "J" => Rank::Jack,
                "Q" => Rank::Queen,
                "K" => Rank::King,
                n => Rank::from_order(n.parse().expect("点数")).expect("点数范围"),
            };
            Card::new(rank, suit)
        })
        .collect()
}

pub fn card(text: &str) -> Card {
    parse_cards(text)[0]
}

/// 叠好牌堆开一手牌：庄家是 Seat::Two，所以 Seat::One 先行动
///
/// `stock` 是发牌和翻牌之后牌堆顶的几张，按摸牌顺序排列；其余的牌随后。
pub fn stacked_session(one: &str, two: &str, upcard: &str, stock: &str) -> GameSession {
    let one = parse_cards(one);
    let two = parse_cards(two);
    assert_eq!(one.len(), HAND_SIZE);
    assert_eq!(two.len(), HAND_SIZE);

    let mut order = Vec::new();
    for i in 0..HAND_SIZE {
        order.push(one[i]);
        order.push(two[i]);
    }
    order.push(card(upcard));
    order.extend(parse_cards(stock));

    let used = mask_of(&order);
    order.extend(full_deck().into_iter().filter(|c| used & c.bit() == 0));

    let deck = Deck::from_draw_order(order).expect("叠牌必须是完整的一副牌");
    GameSession::new(Uuid::new_v4(), Seat::Two, Rules::default(), deck).expect("开局")
}
