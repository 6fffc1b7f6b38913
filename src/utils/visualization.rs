//! Visualization utilities for dynamic_pathfinder
//!
//! Renders grids, visited cells, paths and the agent using gnuplot. Cells are
//! drawn at x = column, y = row with row 0 at the top.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{Cell, PathfindingError, PathfindingResult};
use crate::utils::GridMap;

/// Color palette for consistent styling
pub mod colors {
    pub const WALL: &str = "#4D4D61";
    pub const START: &str = "#4DD973";
    pub const GOAL: &str = "#FAB34D";
    pub const VISITED: &str = "#598CF2";
    pub const PATH: &str = "#33E699";
    pub const AGENT: &str = "#D98CF2";
    pub const INSERTED: &str = "#FF8888";
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

#[derive(Debug, Clone)]
enum Series {
    Points { x: Vec<f64>, y: Vec<f64>, style: PointStyle },
    Line { x: Vec<f64>, y: Vec<f64>, color: String, caption: String },
}

/// Grid plotter; series are collected and drawn on a single set of axes
pub struct Visualizer {
    rows: usize,
    cols: usize,
    title: String,
    series: Vec<Series>,
}

impl Visualizer {
    pub fn new(grid: &GridMap) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            title: String::new(),
            series: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    fn to_xy(&self, cells: &[Cell]) -> (Vec<f64>, Vec<f64>) {
        cells
            .iter()
            .map(|c| (c.col as f64, (self.rows - 1 - c.row.min(self.rows - 1)) as f64))
            .unzip()
    }

    /// Plot cells as markers; empty input is skipped
    pub fn plot_cells(&mut self, cells: &[Cell], style: &PointStyle) -> &mut Self {
        if !cells.is_empty() {
            let (x, y) = self.to_xy(cells);
            self.series.push(Series::Points { x, y, style: style.clone() });
        }
        self
    }

    pub fn plot_walls(&mut self, grid: &GridMap) -> &mut Self {
        let walls: Vec<Cell> = grid.walls().collect();
        self.plot_cells(&walls, &PointStyle::new(colors::WALL, "Wall").with_symbol('S').with_size(1.5))
    }

    pub fn plot_visited(&mut self, visited: &[Cell]) -> &mut Self {
        self.plot_cells(visited, &PointStyle::new(colors::VISITED, "Visited").with_size(0.6))
    }

    pub fn plot_path(&mut self, path: &[Cell], caption: &str) -> &mut Self {
        if !path.is_empty() {
            let (x, y) = self.to_xy(path);
            self.series.push(Series::Line {
                x,
                y,
                color: colors::PATH.to_string(),
                caption: caption.to_string(),
            });
        }
        self
    }

    pub fn plot_agent(&mut self, cell: Cell) -> &mut Self {
        self.plot_cells(&[cell], &PointStyle::new(colors::AGENT, "Agent").with_size(2.0))
    }

    pub fn plot_start(&mut self, cell: Cell) -> &mut Self {
        self.plot_cells(&[cell], &PointStyle::new(colors::START, "Start").with_size(2.0))
    }

    pub fn plot_goal(&mut self, cell: Cell) -> &mut Self {
        self.plot_cells(&[cell], &PointStyle::new(colors::GOAL, "Goal").with_size(2.0))
    }

    fn render(&self) -> Figure {
        let mut figure = Figure::new();
        let axes = figure.axes2d();
        for series in &self.series {
            match series {
                Series::Points { x, y, style } => {
                    axes.points(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            PointSymbol(style.symbol),
                            PointSize(style.size),
                        ],
                    );
                }
                Series::Line { x, y, color, caption } => {
                    axes.lines(x, y, &[Caption(caption), Color(color), LineWidth(2.0)]);
                }
            }
        }
        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_range(AutoOption::Fix(-1.0), AutoOption::Fix(self.cols as f64));
        axes.set_y_range(AutoOption::Fix(-1.0), AutoOption::Fix(self.rows as f64));
        axes.set_aspect_ratio(AutoOption::Fix(self.rows as f64 / self.cols as f64));
        figure
    }

    /// Save plot to PNG file
    pub fn save_png(&self, path: &str, width: u32, height: u32) -> PathfindingResult<()> {
        self.render()
            .save_to_png(path, width, height)
            .map_err(|e| PathfindingError::Visualization(e.to_string()))
    }

    /// Show the plot in a gnuplot window
    pub fn show(&self) -> PathfindingResult<()> {
        self.render()
            .show()
            .map(|_| ())
            .map_err(|e| PathfindingError::Visualization(e.to_string()))
    }
}
