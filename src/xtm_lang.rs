// Multi-language support module
// Localized UI strings for English and Chinese, selected from config, CLI or system locale

#[derive(Debug, Clone)]
pub struct Assets {
    pub app_title: &'static str,

    // Main menu
    pub menu_start: &'static str,
    pub menu_quit: &'static str,
    pub menu_hint: &'static str,
    pub session_fmt: &'static str, // "Session: {} won / {} lost"

    // Difficulty names
    pub diff_beginner: &'static str,
    pub diff_intermediate: &'static str,
    pub diff_expert: &'static str,
    pub diff_custom: &'static str,

    // Difficulty picker
    pub picker_title: &'static str,
    pub picker_width: &'static str,
    pub picker_height: &'static str,
    pub picker_mines: &'static str,
    pub picker_hint_tab: &'static str,
    pub picker_hint_adjust: &'static str,
    pub picker_hint_enter: &'static str,
    pub picker_best_fmt: &'static str, // "Best this session: {}"

    // Game screen
    pub status_fmt: &'static str, // "Mines: {}   Flags: {}   Left: {}"
    pub game_hint: &'static str,
    pub game_over_hint: &'static str,
    pub win_message: &'static str,
    pub loss_message: &'static str,
    pub confirm_quit: &'static str,
    pub numerals: [&'static str; 8], // adjacency counts 1..=8, two columns each

    // Duration units (day, hour, minute, second)
    pub units: [&'static str; 4],

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum size required: {} x {}"
    pub tsmsg_title: &'static str,
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        app_title: "Minesweeper",

        menu_start: "Start game",
        menu_quit: "Quit",
        menu_hint: "Up/Down: select   Enter: confirm   q: quit",
        session_fmt: "Session: {} won / {} lost",

        diff_beginner: "Beginner",
        diff_intermediate: "Intermediate",
        diff_expert: "Expert",
        diff_custom: "Custom",

        picker_title: "Difficulty",
        picker_width: "Width",
        picker_height: "Height",
        picker_mines: "Mines",
        picker_hint_tab: "Tab: switch difficulty",
        picker_hint_adjust: "Up/Down: field   Left/Right: adjust",
        picker_hint_enter: "Enter: start   Esc: back",
        picker_best_fmt: "Best this session: {}",

        status_fmt: "Mines: {}   Flags: {}   Left: {}",
        game_hint: "Arrows/WASD: move   Space: reveal   F: flag   N: new   Q: quit",
        game_over_hint: "Q/Esc: back to difficulty   Ctrl+C: back",
        win_message: "Mines cleared - you win!",
        loss_message: "Boom! You stepped on a mine.",
        confirm_quit: "Quit this game? (y/n)",
        numerals: [" 1", " 2", " 3", " 4", " 5", " 6", " 7", " 8"],

        units: ["d", "h", "m", "s"],

        tsmsg_line1: "Terminal too small",
        tsmsg_line2: "Minimum size required: {} x {}",
        tsmsg_title: "Resize needed",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        app_title: "扫雷",

        menu_start: "开始游戏",
        menu_quit: "退出游戏",
        menu_hint: "上/下：选择   回车：确认   q：退出",
        session_fmt: "本次：胜 {} 局 / 负 {} 局",

        diff_beginner: "简单",
        diff_intermediate: "中等",
        diff_expert: "困难",
        diff_custom: "自定义",

        picker_title: "难度",
        picker_width: "宽",
        picker_height: "高",
        picker_mines: "地雷数",
        picker_hint_tab: "按下TAB键切换",
        picker_hint_adjust: "上/下：选项   左/右：调整",
        picker_hint_enter: "按下ENTER键确认   Esc：返回",
        picker_best_fmt: "本次最佳：{}",

        status_fmt: "地雷数：{}   旗子数：{}   剩余：{}",
        game_hint: "方向键/WASD：移动   空格：翻开   F：插旗   N：新局   Q：退出",
        game_over_hint: "Q/Esc：返回难度选择   Ctrl+C：返回",
        win_message: "扫雷成功！",
        loss_message: "踩雷了，游戏结束！",
        confirm_quit: "退出本局吗？(y/n)",
        numerals: ["一", "二", "三", "四", "五", "六", "七", "八"],

        units: ["天", "时", "分", "秒"],

        tsmsg_line1: "终端屏幕过小",
        tsmsg_line2: "最小需要尺寸：{} x {}",
        tsmsg_title: "需要调整大小",
    }
}

/// Main language manager struct
/// Holds the current language code and active string assets
#[derive(Debug, Clone)]
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Creates a new Lang instance from a language code
    /// Normalizes input (e.g., "zh-CN" → "zh") and defaults to English for unsupported languages
    pub fn new(lang_code: &str) -> Self {
        let code = if lang_code.to_lowercase().starts_with("zh") {
            "zh"
        } else {
            "en"
        };

        Lang {
            current_lang: code.to_string(),
            assets: if code == "zh" {
                chinese_assets()
            } else {
                english_assets()
            },
        }
    }

    /// Language of the running system, "en" when it cannot be determined
    pub fn system_code() -> String {
        sys_locale::get_locale().unwrap_or_else(|| "en".to_string())
    }

    /// Get localized difficulty name by picker index
    /// Index mapping: 0=Beginner, 1=Intermediate, 2=Expert, 3=Custom
    pub fn diff_name(&self, index: usize) -> &'static str {
        match index {
            0 => self.assets.diff_beginner,
            1 => self.assets.diff_intermediate,
            2 => self.assets.diff_expert,
            _ => self.assets.diff_custom,
        }
    }

    /// Field labels in [`crate::xtm_difficulty::DifficultyField`] order
    pub fn field_names(&self) -> [&'static str; 3] {
        [
            self.assets.picker_width,
            self.assets.picker_height,
            self.assets.picker_mines,
        ]
    }

    /// Format an elapsed time in seconds, largest units first
    /// English: "1h 2m 5s", Chinese: "1时2分5秒"
    pub fn format_duration(&self, secs: u64) -> String {
        let [d, h, m, s] = self.assets.units;
        let sep = if self.current_lang == "zh" { "" } else { " " };
        let mut rest = secs;
        let mut out = String::new();
        for (size, unit) in [(86_400, d), (3_600, h), (60, m)] {
            if rest >= size {
                out.push_str(&format!("{}{}{}", rest / size, unit, sep));
                rest %= size;
            }
        }
        out.push_str(&format!("{}{}", rest, s));
        out
    }
}

/// Substitute each `{}` in a localized template with the next argument
pub fn fill(template: &str, args: &[&dyn std::fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut parts = template.split("{}");
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for (i, part) in parts.enumerate() {
        if let Some(arg) = args.get(i) {
            out.push_str(&arg.to_string());
        }
        out.push_str(part);
    }
    out
}
