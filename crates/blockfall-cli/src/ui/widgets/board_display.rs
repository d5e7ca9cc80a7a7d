use std::iter;

use blockfall_engine::{BoardSize, GridPos, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{BlockDisplay, style};

/// The playfield: a `cols x rows` grid of [`BlockDisplay`] cells.
///
/// Cells outside the grid, such as a piece still entering from above, are not
/// drawn.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    size: BoardSize,
    grid: Vec<Option<PieceKind>>,
    dimmed: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new<I>(size: BoardSize, cells: I) -> Self
    where
        I: IntoIterator<Item = (GridPos, PieceKind)>,
    {
        let cols = usize::from(size.cols);
        let mut grid = vec![None; cols * usize::from(size.rows)];
        for (pos, kind) in cells {
            let (Ok(col), Ok(row)) = (usize::try_from(pos.col), usize::try_from(pos.row)) else {
                continue;
            };
            if col < cols
                && let Some(cell) = grid.get_mut(row * cols + col)
            {
                *cell = Some(kind);
            }
        }
        Self {
            size,
            grid,
            dimmed: false,
            block: None,
        }
    }

    pub fn dimmed(self, dimmed: bool) -> Self {
        Self { dimmed, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        self.size.cols.saturating_mul(BlockDisplay::width())
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.size.rows.saturating_mul(BlockDisplay::height())
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let cols = usize::from(self.size.cols);
        let rows = usize::from(self.size.rows);
        let horizontal =
            Layout::horizontal(iter::repeat_n(Constraint::Length(BlockDisplay::width()), cols))
                .flex(Flex::Center);
        let vertical =
            Layout::vertical(iter::repeat_n(Constraint::Length(BlockDisplay::height()), rows));

        let row_areas = vertical.split(area);
        for (row_area, row) in iter::zip(row_areas.iter(), self.grid.chunks(cols)) {
            let cell_areas = horizontal.split(*row_area);
            for (cell_area, cell) in iter::zip(cell_areas.iter(), row) {
                BlockDisplay::from_cell(*cell).render(*cell_area, buf);
            }
        }

        if self.dimmed {
            buf.set_style(area, style::DIMMED);
        }
    }
}
