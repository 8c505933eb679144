use eframe::egui;

use photograde::batch::ImageBatch;
use photograde::export;
use photograde::scores::{self, Evaluation, ScoreSheet};
use photograde::sheet::{GridOptions, SheetOptions, pdf::render_contact_sheet_file};

use super::gallery::Gallery;

pub struct ReviewApp {
    batch: ImageBatch,
    sheet: Option<ScoreSheet>,
    gallery: Gallery,
    /// Which image is shown full-size instead of the grid, if any.
    enlarged: Option<usize>,
    columns: usize,
    status_message: String,
    paste_open: bool,
    paste_text: String,
}

impl Default for ReviewApp {
    fn default() -> Self {
        Self {
            batch: ImageBatch::new(),
            sheet: None,
            gallery: Gallery::new(),
            enlarged: None,
            columns: 2,
            status_message: String::from("Ready - Open images to start a review round"),
            paste_open: false,
            paste_text: String::new(),
        }
    }
}

impl ReviewApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    fn open_images(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_files()
        {
            match ImageBatch::from_files(&paths) {
                Ok(batch) => {
                    self.gallery.reset(batch.len());
                    self.enlarged = None;
                    self.status_message = format!("Loaded {} images", batch.len());
                    self.batch = batch;
                }
                Err(e) => {
                    self.status_message = format!("Error loading images: {}", e);
                }
            }
        }
    }

    fn load_scores(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .pick_file()
        {
            match scores::load_scores(&path) {
                Ok(sheet) => {
                    let matched = sheet.attach(&self.batch).iter().flatten().count();
                    self.status_message = format!(
                        "Loaded {} score rows ({} of {} images matched)",
                        sheet.len(),
                        matched,
                        self.batch.len()
                    );
                    self.sheet = Some(sheet);
                }
                Err(e) => {
                    // Keep whatever sheet was loaded before.
                    self.status_message = format!("Error reading score sheet: {}", e);
                }
            }
        }
    }

    /// Parse the pasted CSV text the same way a loaded file would be.
    /// Returns true when the sheet was replaced.
    fn apply_pasted_scores(&mut self) -> bool {
        match scores::parse_scores(self.paste_text.as_bytes()) {
            Ok(sheet) => {
                let matched = sheet.attach(&self.batch).iter().flatten().count();
                self.status_message = format!(
                    "Applied {} pasted rows ({} of {} images matched)",
                    sheet.len(),
                    matched,
                    self.batch.len()
                );
                self.sheet = Some(sheet);
                true
            }
            Err(e) => {
                self.status_message = format!("Error in pasted scores: {}", e);
                false
            }
        }
    }

    fn render_paste_window(&mut self, ctx: &egui::Context) {
        if !self.paste_open {
            return;
        }
        let mut open = self.paste_open;
        let mut applied = false;
        egui::Window::new("Paste score CSV")
            .open(&mut open)
            .resizable(true)
            .show(ctx, |ui| {
                ui.label("Paste the filled sheet below, header row included.");
                ui.add(
                    egui::TextEdit::multiline(&mut self.paste_text)
                        .desired_rows(12)
                        .desired_width(f32::INFINITY)
                        .code_editor(),
                );
                if ui.button("Apply").clicked() {
                    applied = true;
                }
            });
        if applied && self.apply_pasted_scores() {
            open = false;
        }
        self.paste_open = open;
    }

    fn save_template(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("scores.csv")
            .save_file()
        else {
            return;
        };
        let result = std::fs::File::create(&path)
            .map_err(photograde::Error::from)
            .and_then(|file| scores::write_template(file, &self.batch));
        self.status_message = match result {
            Ok(()) => format!("Wrote template to '{}'", path.display()),
            Err(e) => format!("Error writing template: {}", e),
        };
    }

    fn save_merged(&mut self) {
        let Some(sheet) = &self.sheet else {
            self.status_message = String::from("Load a score sheet first");
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("merged.csv")
            .save_file()
        else {
            return;
        };
        let result = std::fs::File::create(&path)
            .map_err(photograde::Error::from)
            .and_then(|file| scores::write_merged(file, &self.batch, sheet));
        self.status_message = match result {
            Ok(()) => format!("Wrote merged sheet to '{}'", path.display()),
            Err(e) => format!("Error writing merged sheet: {}", e),
        };
    }

    fn export_pdf(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("review.pdf")
            .save_file()
        else {
            return;
        };
        let opts = SheetOptions {
            grid: GridOptions {
                columns: self.columns,
                ..GridOptions::default()
            },
            ..SheetOptions::default()
        };
        let result = render_contact_sheet_file(&path, &self.batch, self.sheet.as_ref(), &opts);
        self.status_message = match result {
            Ok(()) => format!("Wrote contact sheet to '{}'", path.display()),
            Err(e) => format!("Error writing contact sheet: {}", e),
        };
    }

    fn export_zip(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("scored_images.zip")
            .save_file()
        else {
            return;
        };
        let result = export::write_archive_file(
            &path,
            &self.batch,
            self.sheet.as_ref(),
            export::DEFAULT_COMMENT_LEN,
        );
        self.status_message = match result {
            Ok(()) => format!("Packed {} images into '{}'", self.batch.len(), path.display()),
            Err(e) => format!("Error writing archive: {}", e),
        };
    }

    /// Grid order: ranked pairs first when a sheet is loaded, then every
    /// unscored image in batch order so no image drops out of the review.
    fn display_order(&self) -> Vec<(usize, Option<Evaluation>)> {
        match &self.sheet {
            Some(sheet) => {
                let ranked = sheet.ranked(&self.batch);
                let mut seen = vec![false; self.batch.len()];
                let mut order: Vec<(usize, Option<Evaluation>)> = Vec::new();
                for (index, eval) in ranked {
                    seen[index] = true;
                    order.push((index, Some(eval.clone())));
                }
                for record in self.batch.iter() {
                    if !seen[record.index] {
                        order.push((record.index, None));
                    }
                }
                order
            }
            None => self.batch.iter().map(|r| (r.index, None)).collect(),
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open Images").clicked() {
                self.open_images();
            }
            if ui
                .add_enabled(!self.batch.is_empty(), egui::Button::new("Load Scores CSV"))
                .clicked()
            {
                self.load_scores();
            }
            if ui
                .add_enabled(!self.batch.is_empty(), egui::Button::new("Paste Scores"))
                .clicked()
            {
                self.paste_open = true;
            }

            ui.separator();

            let have_batch = !self.batch.is_empty();
            if ui
                .add_enabled(have_batch, egui::Button::new("Save Template"))
                .clicked()
            {
                self.save_template();
            }
            if ui
                .add_enabled(have_batch && self.sheet.is_some(), egui::Button::new("Save Merged"))
                .clicked()
            {
                self.save_merged();
            }
            if ui
                .add_enabled(have_batch, egui::Button::new("Export PDF"))
                .clicked()
            {
                self.export_pdf();
            }
            if ui
                .add_enabled(have_batch, egui::Button::new("Export ZIP"))
                .clicked()
            {
                self.export_zip();
            }

            ui.separator();

            ui.label("Columns:");
            ui.add(egui::Slider::new(&mut self.columns, 1..=4));
        });
    }

    fn render_side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Ranking");
        ui.separator();

        let Some(sheet) = &self.sheet else {
            ui.label("No score sheet loaded");
            return;
        };

        let ranked: Vec<(usize, String)> = sheet
            .ranked(&self.batch)
            .into_iter()
            .map(|(index, eval)| {
                let name = self
                    .batch
                    .get(index)
                    .map(|r| r.sequence_name())
                    .unwrap_or_default();
                (index, format!("{}  {}", name, eval.score_line()))
            })
            .collect();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, label) in ranked {
                let is_enlarged = self.enlarged == Some(index);
                if ui.selectable_label(is_enlarged, label).clicked() {
                    self.enlarged = Some(index);
                }
            }
        });
    }

    fn render_enlarged(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, index: usize) {
        ui.horizontal(|ui| {
            let name = self
                .batch
                .get(index)
                .map(|r| r.display_name())
                .unwrap_or_default();
            ui.heading(format!("Full view: {}", name));
            if ui.button("Close").clicked() {
                self.enlarged = None;
            }
        });
        ui.separator();

        match self.gallery.full(ctx, &self.batch, index) {
            Some(texture) => {
                let avail = ui.available_size();
                ui.add(egui::Image::new(&texture).max_size(avail));
            }
            None => {
                ui.label("Image could not be decoded");
            }
        }
    }

    fn render_grid(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.batch.is_empty() {
            ui.label("No images loaded");
            return;
        }

        let order = self.display_order();
        let columns = self.columns.max(1);

        egui::ScrollArea::vertical().show(ui, |ui| {
            for chunk in order.chunks(columns) {
                ui.columns(columns, |cols| {
                    for (slot, (index, eval)) in chunk.iter().enumerate() {
                        self.render_cell(&mut cols[slot], ctx, *index, eval.as_ref());
                    }
                });
                ui.add_space(12.0);
            }
        });
    }

    fn render_cell(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        index: usize,
        eval: Option<&Evaluation>,
    ) {
        let Some(record) = self.batch.get(index) else {
            return;
        };
        let name = record.display_name();

        match self.gallery.thumb(ctx, &self.batch, index) {
            Some(texture) => {
                let width = ui.available_width();
                ui.add(egui::Image::new(&texture).max_size(egui::vec2(width, 320.0)));
            }
            None => {
                ui.label("[unreadable image]");
            }
        }

        ui.horizontal(|ui| {
            ui.strong(name);
            if ui.small_button("Enlarge").clicked() {
                self.enlarged = Some(index);
            }
        });

        if let Some(eval) = eval {
            ui.label(eval.score_line());
            if !eval.reason.is_empty() {
                ui.label(egui::RichText::new(&eval.reason).small());
            }
        }
    }
}

impl eframe::App for ReviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Escape closes the enlarged view, like the original's
        // one-click dismiss.
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.enlarged = None;
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let rows = self.sheet.as_ref().map(|s| s.len()).unwrap_or(0);
                    ui.label(format!(
                        "Images: {} | Score rows: {}",
                        self.batch.len(),
                        rows
                    ));
                });
            });
        });

        egui::SidePanel::left("ranking_panel")
            .default_width(230.0)
            .show(ctx, |ui| {
                self.render_side_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.enlarged {
            Some(index) => self.render_enlarged(ui, ctx, index),
            None => self.render_grid(ui, ctx),
        });

        self.render_paste_window(ctx);
    }
}
