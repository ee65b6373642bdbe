// Layout domain model - rows, groups and automatic grid placement
use super::panel::{DataSourceRef, GridPos, Panel, PanelKind};

pub const GRID_WIDTH: u32 = 24;

/// Panels that sit side by side at a shared height.
#[derive(Debug, Clone)]
pub struct PanelRow {
    pub datasource: Option<DataSourceRef>,
    pub height: u32,
    pub panels: Vec<Panel>,
}

impl PanelRow {
    pub fn new(datasource: Option<DataSourceRef>, height: u32, panels: Vec<Panel>) -> Self {
        Self {
            datasource,
            height,
            panels,
        }
    }
}

/// Rows placed under a titled section header.
#[derive(Debug, Clone)]
pub struct PanelGroup {
    pub title: String,
    pub rows: Vec<PanelRow>,
}

impl PanelGroup {
    pub fn new(title: impl Into<String>, rows: Vec<PanelRow>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LayoutItem {
    Row(PanelRow),
    Group(PanelGroup),
}

impl From<PanelRow> for LayoutItem {
    fn from(row: PanelRow) -> Self {
        LayoutItem::Row(row)
    }
}

impl From<PanelGroup> for LayoutItem {
    fn from(group: PanelGroup) -> Self {
        LayoutItem::Group(group)
    }
}

/// Flatten rows and groups into positioned panels.
///
/// Panels in a row split the 24 column grid evenly, leftmost panels taking
/// any remainder. A row fits at most 24 panels: past that every panel gets
/// width 1 and the row runs off the right edge of the grid.
///
/// Ids are sequential from 1 in emission order and every target gets a ref
/// id (`A`, `B`, ...).
pub fn auto_layout(items: Vec<LayoutItem>) -> Vec<Panel> {
    let mut placer = Placer::default();
    for item in items {
        match item {
            LayoutItem::Row(row) => placer.place_row(row),
            LayoutItem::Group(group) => {
                let mut header = Panel::row(group.title);
                header.grid_pos = GridPos {
                    h: 1,
                    w: GRID_WIDTH,
                    x: 0,
                    y: placer.y,
                };
                placer.push(header);
                placer.y += 1;
                for row in group.rows {
                    placer.place_row(row);
                }
            }
        }
    }
    placer.panels
}

#[derive(Default)]
struct Placer {
    panels: Vec<Panel>,
    y: u32,
}

impl Placer {
    fn push(&mut self, mut panel: Panel) {
        panel.id = self.panels.len() as u32 + 1;
        self.panels.push(panel);
    }

    fn place_row(&mut self, row: PanelRow) {
        if row.panels.is_empty() {
            return;
        }

        let count = row.panels.len() as u32;
        let base = (GRID_WIDTH / count).max(1);
        let remainder = GRID_WIDTH.saturating_sub(base * count);
        let mut x = 0;

        for (i, mut panel) in row.panels.into_iter().enumerate() {
            let w = if (i as u32) < remainder { base + 1 } else { base };
            panel.grid_pos = GridPos {
                h: row.height,
                w,
                x,
                y: self.y,
            };
            x += w;

            if panel.kind != PanelKind::Row {
                if panel.datasource.is_none() {
                    panel.datasource = row.datasource.clone();
                }
                assign_targets(&mut panel);
            }
            self.push(panel);
        }

        self.y += row.height;
    }
}

fn assign_targets(panel: &mut Panel) {
    for (i, target) in panel.targets.iter_mut().enumerate() {
        target.ref_id = ref_id(i);
        if target.datasource.is_none() {
            target.datasource = panel.datasource.clone();
        }
    }
}

/// Spreadsheet style ids: A..Z, AA, AB, ...
fn ref_id(index: usize) -> String {
    let mut n = index + 1;
    let mut id = Vec::new();
    while n > 0 {
        n -= 1;
        id.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    id.reverse();
    String::from_utf8(id).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::panel::Target;

    fn panel(title: &str, targets: usize) -> Panel {
        let mut panel = Panel::row(title);
        panel.kind = PanelKind::Stat;
        panel.collapsed = None;
        panel.panels = None;
        panel.targets = (0..targets).map(|i| Target::range(format!("q{}", i))).collect();
        panel
    }

    #[test]
    fn test_ref_ids() {
        assert_eq!(ref_id(0), "A");
        assert_eq!(ref_id(3), "D");
        assert_eq!(ref_id(25), "Z");
        assert_eq!(ref_id(26), "AA");
    }

    #[test]
    fn test_row_splits_grid_evenly() {
        let panels = auto_layout(vec![
            PanelRow::new(None, 12, vec![panel("a", 1), panel("b", 1)]).into(),
            PanelRow::new(None, 10, (0..4).map(|i| panel(&i.to_string(), 1)).collect()).into(),
        ]);

        let widths: Vec<u32> = panels.iter().map(|p| p.grid_pos.w).collect();
        assert_eq!(widths, vec![12, 12, 6, 6, 6, 6]);
        let xs: Vec<u32> = panels.iter().map(|p| p.grid_pos.x).collect();
        assert_eq!(xs, vec![0, 12, 0, 6, 12, 18]);
        assert_eq!(panels[2].grid_pos.y, 12);
        assert_eq!(panels[5].grid_pos.h, 10);
    }

    #[test]
    fn test_uneven_split_gives_remainder_to_leftmost() {
        let panels = auto_layout(vec![
            PanelRow::new(None, 3, (0..5).map(|i| panel(&i.to_string(), 0)).collect()).into(),
        ]);
        let widths: Vec<u32> = panels.iter().map(|p| p.grid_pos.w).collect();
        assert_eq!(widths, vec![5, 5, 5, 5, 4]);
        assert_eq!(widths.iter().sum::<u32>(), GRID_WIDTH);
    }

    #[test]
    fn test_row_wider_than_grid_overflows() {
        let panels = auto_layout(vec![
            PanelRow::new(None, 4, (0..30).map(|i| panel(&i.to_string(), 0)).collect()).into(),
        ]);
        assert!(panels.iter().all(|p| p.grid_pos.w == 1));
        assert_eq!(panels[29].grid_pos.x, 29);
        assert!(panels.iter().all(|p| p.grid_pos.y == 0));
    }

    #[test]
    fn test_group_emits_header_row() {
        let ds = DataSourceRef::new("${DS_PROMETHEUS}");
        let panels = auto_layout(vec![
            PanelGroup::new("Overview", vec![PanelRow::new(Some(ds.clone()), 3, vec![panel("a", 2)])]).into(),
            PanelRow::new(None, 0, vec![]).into(),
            PanelRow::new(Some(ds.clone()), 6, vec![panel("b", 1)]).into(),
        ]);

        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0].kind, PanelKind::Row);
        assert_eq!(panels[0].grid_pos, GridPos { h: 1, w: 24, x: 0, y: 0 });
        assert_eq!(panels[1].grid_pos.y, 1);
        assert_eq!(panels[2].grid_pos.y, 4);

        let ids: Vec<u32> = panels.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(panels[1].datasource.as_ref(), Some(&ds));
        let refs: Vec<&str> = panels[1].targets.iter().map(|t| t.ref_id.as_str()).collect();
        assert_eq!(refs, vec!["A", "B"]);
        assert_eq!(panels[1].targets[1].datasource.as_ref(), Some(&ds));
        assert!(panels[0].datasource.is_none());
    }
}
