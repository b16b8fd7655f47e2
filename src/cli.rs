use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "picviewer")]
#[command(about = "ローカル画像ギャラリーのタグ・入手元URL管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 画像フォルダ（設定ファイルより優先）
    #[arg(long, global = true)]
    pub pics_dir: Option<PathBuf>,

    /// 開発サーバーのURL（指定するとHTTP経由で読み書き）
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像フォルダをスキャンしてJSONで出力
    Scan,

    /// 画像一覧を表示（ファイル名検索・タグ絞り込み）
    List {
        /// ファイル名の部分一致検索
        #[arg(short, long, default_value = "")]
        search: String,

        /// 絞り込むタグ（複数指定時はすべてを含むもの）
        #[arg(short, long)]
        tag: Vec<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 使われているタグの一覧
    Tags,

    /// 1枚分のメタデータを表示
    Show {
        /// 画像ファイル名または /pics/ パス
        #[arg(required = true)]
        image: String,
    },

    /// タグ・入手元URLを編集（オプションなしなら対話モード）
    Edit {
        /// 画像ファイル名または /pics/ パス
        #[arg(required = true)]
        image: String,

        /// タグ（指定するとタグ全体を置き換え）
        #[arg(short, long)]
        tag: Vec<String>,

        /// タグをすべて削除
        #[arg(long, conflicts_with = "tag")]
        clear_tags: bool,

        /// 入手元URL（空文字で削除）
        #[arg(short = 'u', long)]
        source_url: Option<String>,
    },

    /// 開発サーバーを起動
    Serve {
        /// ポート番号（設定ファイルより優先）
        #[arg(short, long)]
        port: Option<u16>,

        /// 公開ディレクトリ
        #[arg(long)]
        public_dir: Option<PathBuf>,
    },

    /// 静的ホスティング用の api/scan-pics.json を生成
    Generate {
        /// 公開ディレクトリ
        #[arg(long)]
        public_dir: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 開発サーバーURLを設定（空文字で解除）
        #[arg(long)]
        set_server_url: Option<String>,

        /// 画像フォルダを設定
        #[arg(long)]
        set_pics_dir: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
