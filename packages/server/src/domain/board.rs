//! 3×3 の盤面と勝敗判定

use super::value_object::{CELL_COUNT, CellIndex, Symbol};

/// 勝ちになる 3 マスの組（行 3、列 3、対角 2）
pub const WINNING_LINES: [[usize; 3]; 8] = [
    // rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// 盤面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Option<Symbol>; CELL_COUNT],
}

/// 盤面に対する 1 手の評価結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    /// 続行
    Open,
    /// `symbol` が `line` を揃えて勝利
    Won { symbol: Symbol, line: [usize; 3] },
    /// 全マスが埋まり、揃った列がない
    Draw,
}

impl Board {
    /// 空の盤面
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Option<Symbol>; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, index: CellIndex) -> Option<Symbol> {
        self.cells[index.value()]
    }

    pub fn is_occupied(&self, index: CellIndex) -> bool {
        self.get(index).is_some()
    }

    /// セルに記号を置く。置けたら `true`、既に埋まっていれば `false`。
    pub fn place(&mut self, index: CellIndex, symbol: Symbol) -> bool {
        let cell = &mut self.cells[index.value()];
        if cell.is_some() {
            return false;
        }
        *cell = Some(symbol);
        true
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// 揃っている最初の列を返す
    pub fn winning_line(&self) -> Option<(Symbol, [usize; 3])> {
        WINNING_LINES.iter().find_map(|line| {
            let [a, b, c] = *line;
            match self.cells[a] {
                Some(symbol) if self.cells[b] == Some(symbol) && self.cells[c] == Some(symbol) => {
                    Some((symbol, *line))
                }
                _ => None,
            }
        })
    }

    /// 勝ちを引き分けより先に判定する
    ///
    /// 最後の 1 マスを埋めつつ列を揃えた手は引き分けではなく勝ち。
    pub fn evaluate(&self) -> BoardState {
        if let Some((symbol, line)) = self.winning_line() {
            BoardState::Won { symbol, line }
        } else if self.is_full() {
            BoardState::Draw
        } else {
            BoardState::Open
        }
    }
}
