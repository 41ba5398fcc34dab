use serde::Serialize;

/// A selectable board category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub value: &'static str,
    pub label: &'static str,
}

/// Categories offered by the post composer.
pub const CATEGORIES: &[Category] = &[
    Category {
        value: "free",
        label: "자유게시판",
    },
    Category {
        value: "finance-prediction",
        label: "금융 정보 > 예측",
    },
    Category {
        value: "finance-airdrop",
        label: "금융 정보 > 에어드랍",
    },
    Category {
        value: "finance-showoff",
        label: "금융 정보 > 자랑글",
    },
    Category {
        value: "game-guide",
        label: "게임 > 공략",
    },
    Category {
        value: "game-item",
        label: "게임 > 아이템",
    },
    Category {
        value: "game-free",
        label: "게임 > 자유",
    },
    Category {
        value: "build",
        label: "빌드",
    },
    Category {
        value: "security-vulnerability",
        label: "보안 > 취약점 제보",
    },
    Category {
        value: "security-news",
        label: "보안 > 보안 뉴스",
    },
];

/// Catalog entry for a stored category value.
pub fn find_category(value: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.value == value)
}
