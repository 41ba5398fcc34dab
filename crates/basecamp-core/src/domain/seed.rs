//! Demo posts bundled with the board.

use super::Post;

struct Seed {
    id: i64,
    title: &'static str,
    author: &'static str,
    date: &'static str,
    likes: u64,
    dislikes: u64,
    comments: u64,
    views: u64,
    category: &'static str,
    tags: &'static [&'static str],
    address: &'static str,
    content: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: 1,
        title: "Base 생태계 완전 정복 가이드",
        author: "base-master",
        date: "2025-01-20",
        likes: 156,
        dislikes: 3,
        comments: 42,
        views: 1234,
        category: "가이드",
        tags: &["가이드", "튜토리얼"],
        address: "0x1234567890123456789012345678901234567890",
        content: "# Base 생태계 완전 정복 가이드\n\n\
                  Base는 Coinbase가 개발한 Ethereum Layer 2 솔루션으로, 낮은 가스비와 빠른 트랜잭션 속도를 제공합니다.\n\n\
                  ## 1. Base란 무엇인가?\n\n\
                  - **낮은 가스비**: Ethereum 메인넷 대비 저렴한 거래 수수료\n\
                  - **빠른 속도**: 평균 2초 이내의 블록 생성 시간\n\
                  - **EVM 호환성**: 기존 Ethereum 도구와 호환\n\n\
                  ## 2. 테스트넷 사용하기\n\n\
                  ```javascript\nconst baseSepolia = { chainId: '0x14a34', rpcUrls: ['https://sepolia.base.org'] };\n```",
    },
    Seed {
        id: 2,
        title: "Frame 기반 미니게임 런칭기",
        author: "degen-builder",
        date: "2025-01-19",
        likes: 42,
        dislikes: 1,
        comments: 12,
        views: 234,
        category: "게임",
        tags: &["게임", "Frame"],
        address: "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd",
        content: "Base 위에서 Frame 미니게임을 런칭하며 겪은 일들을 정리했습니다.\n\n\
                  ## 배운 점\n\n\
                  - 가벼운 온체인 상태가 핵심\n\
                  - 첫 주 사용자 대부분은 Farcaster에서 유입",
    },
    Seed {
        id: 3,
        title: "ERC-1155 인벤토리 설계 팁",
        author: "solidity-cat",
        date: "2025-01-18",
        likes: 31,
        dislikes: 0,
        comments: 8,
        views: 189,
        category: "개발",
        tags: &["개발", "ERC-1155"],
        address: "0x9876543210987654321098765432109876543210",
        content: "Base 게임에서 ERC-1155로 인벤토리를 설계할 때 유용한 패턴을 공유합니다.\n\n\
                  ### 배치 전송\n\n\
                  여러 아이템을 한 번에 옮기면 가스를 크게 아낄 수 있습니다.",
    },
    Seed {
        id: 4,
        title: "Base 가스 최적화 실험 결과 공유",
        author: "rollup-nerd",
        date: "2025-01-17",
        likes: 27,
        dislikes: 2,
        comments: 15,
        views: 312,
        category: "기술",
        tags: &["최적화", "가스"],
        address: "0xfedcba0987654321fedcba0987654321fedcba09",
        content: "calldata 압축과 storage packing이 Base에서 얼마나 효과가 있는지 측정했습니다.\n\n\
                  - calldata 압축: 약 38% 절감\n\
                  - storage packing: 약 21% 절감",
    },
];

/// The fixed demo collection, newest first.
pub fn seed_posts() -> Vec<Post> {
    SEEDS
        .iter()
        .map(|s| Post {
            id: s.id,
            title: s.title.to_string(),
            author: s.author.to_string(),
            date: s.date.to_string(),
            category: Some(s.category.to_string()),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
            author_address: None,
            donation_address: Some(s.address.to_string()),
            contract_address: Some(s.address.to_string()),
            content: s.content.to_string(),
            likes: s.likes,
            dislikes: s.dislikes,
            comments: s.comments,
            views: s.views,
            files: Vec::new(),
            user_vote: None,
        })
        .collect()
}

/// Look up a single seed post.
pub fn seed_post(id: i64) -> Option<Post> {
    seed_posts().into_iter().find(|p| p.id == id)
}

pub fn is_seed_id(id: i64) -> bool {
    SEEDS.iter().any(|s| s.id == id)
}
