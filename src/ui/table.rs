use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 240.0;

/// Scrollable preview of the loaded table; dtype shown under each header.
pub fn data_table(ui: &mut Ui, dataset: &Dataset) {
    let columns = dataset.columns();
    if columns.is_empty() {
        ui.label("The table has no columns.");
        return;
    }

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .column(Column::auto().at_least(32.0))
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(36.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.vertical(|ui: &mut Ui| {
                            ui.strong(col.name.as_str());
                            ui.label(RichText::new(col.dtype.to_string()).weak().small());
                        });
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                    let idx = row.index();
                    row.col(|ui: &mut Ui| {
                        ui.label(idx.to_string());
                    });
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(col.values[idx].to_string());
                        });
                    }
                });
            });
    });
}
