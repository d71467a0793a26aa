//! # pmoconfig - Configuration de pmogen
//!
//! Ce module gère la configuration du générateur :
//! - document par défaut intégré (`pmogen.yaml`)
//! - fusion avec le fichier `config.yaml` du répertoire de configuration
//! - surcharges par variables d'environnement `PMOGEN_CONFIG__SECTION__CLE`
//! - accesseurs typés avec valeurs par défaut
//!
//! ## Usage
//!
//! ```no_run
//! use pmoconfig::Config;
//!
//! let config = Config::load_config("")?;
//! let language = config.get_language()?;
//! let output_dir = config.get_output_dir()?;
//!
//! config.set_namespace("Acme.UPnP".to_string())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, anyhow};
use dirs::home_dir;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};
use tracing::{debug, info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("pmogen.yaml");

const CONFIG_FILE: &str = "config.yaml";
const CONFIG_DIR_NAME: &str = ".pmogen";
const ENV_CONFIG_DIR: &str = "PMOGEN_CONFIG";
const ENV_PREFIX: &str = "PMOGEN_CONFIG__";

// Valeurs par défaut
const DEFAULT_LANGUAGE: &str = "csharp";
const DEFAULT_NAMESPACE: &str = "UPnP";
const DEFAULT_OUTPUT_DIR: &str = "generated";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_MIN_LEVEL: &str = "info";

/// Getter/setter d'une valeur booléenne avec défaut
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Getter/setter d'une chaîne non vide avec défaut
macro_rules! impl_string_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<String> {
            match self.get_value($path) {
                Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
                _ => Ok($default.to_string()),
            }
        }

        pub fn $setter(&self, value: String) -> Result<()> {
            self.set_value($path, Value::String(value))
        }
    };
}

/// Gestionnaire de configuration de pmogen
///
/// La configuration est chargée une fois, fusionnée avec les valeurs par
/// défaut, puis réécrite dans `config.yaml` à chaque modification.
#[derive(Debug)]
pub struct Config {
    config_dir: PathBuf,
    path: PathBuf,
    data: Mutex<Value>,
}

impl Config {
    /// Répertoire de configuration, dans l'ordre : argument, variable
    /// `PMOGEN_CONFIG`, `./.pmogen`, `~/.pmogen`, puis `./.pmogen` par défaut.
    fn find_config_dir(directory: &str) -> PathBuf {
        if !directory.is_empty() {
            return PathBuf::from(directory);
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Trying to load config from env");
            return PathBuf::from(env_path);
        }

        if Path::new(CONFIG_DIR_NAME).exists() {
            return PathBuf::from(CONFIG_DIR_NAME);
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config;
            }
        }

        PathBuf::from(CONFIG_DIR_NAME)
    }

    /// Crée le répertoire si besoin et vérifie les droits de lecture/écriture
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Cannot create config directory {}", path.display()))?;
        }

        if !path.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }

        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")
            .with_context(|| format!("Config directory {} is not writable", path.display()))?;
        fs::remove_file(&test_file)?;
        fs::read_dir(path)?;

        Ok(())
    }

    /// Détermine et valide le répertoire de configuration
    pub fn config_dir(directory: &str) -> Result<PathBuf> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(&dir_path)?;
        Ok(dir_path)
    }

    /// Charge la configuration du répertoire indiqué (vide : recherche par
    /// défaut), applique les surcharges d'environnement puis sauvegarde le
    /// résultat fusionné.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir = %config_dir.display(), "Using config directory");

        let path = config_dir.join(CONFIG_FILE);
        let mut config_value: Value =
            serde_yaml::from_str(DEFAULT_CONFIG).context("Invalid embedded configuration")?;

        match fs::read(&path) {
            Ok(data) => {
                info!(config_file = %path.display(), "Loaded config file");
                let external_value: Value = serde_yaml::from_slice(&data)
                    .with_context(|| format!("Invalid configuration file {}", path.display()))?;
                merge_yaml(&mut config_value, &lower_keys_value(external_value));
            }
            Err(_) => {
                info!(config_file = %path.display(), "Config file not found, using default embedded config");
            }
        }

        let mut config_value = lower_keys_value(config_value);
        apply_overrides(&mut config_value, env::vars());

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };
        config.save()?;
        Ok(config)
    }

    fn data(&self) -> Result<MutexGuard<'_, Value>> {
        self.data
            .lock()
            .map_err(|_| anyhow!("Configuration lock poisoned"))
    }

    /// Répertoire de configuration effectif
    pub fn dir(&self) -> &Path {
        &self.config_dir
    }

    /// Chemin du fichier `config.yaml`
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&*self.data()?)?;
        fs::write(&self.path, yaml)
            .with_context(|| format!("Cannot write {}", self.path.display()))?;
        Ok(())
    }

    /// Document complet, tel qu'il serait sauvegardé
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&*self.data()?)?)
    }

    /// Définit une valeur (ex. `&["generator", "language"]`) et sauvegarde
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.data()?;
            set_value_internal(&mut data, path, value)?;
        }
        self.save()
    }

    /// Définit une valeur depuis sa forme textuelle `a.b.c` = `texte YAML`
    pub fn set_from_str(&self, dotted_path: &str, value: &str) -> Result<()> {
        let path: Vec<&str> = dotted_path.split('.').filter(|k| !k.is_empty()).collect();
        if path.is_empty() {
            return Err(anyhow!("Empty configuration path"));
        }
        self.set_value(&path, convert_value(value))
    }

    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        get_value_internal(&*self.data()?, path)
    }

    impl_string_config!(
        get_language,
        set_language,
        &["generator", "language"],
        DEFAULT_LANGUAGE
    );

    impl_string_config!(
        get_namespace,
        set_namespace,
        &["generator", "namespace"],
        DEFAULT_NAMESPACE
    );

    impl_bool_config!(
        get_partial_classes,
        set_partial_classes,
        &["generator", "partial_classes"],
        false
    );

    impl_bool_config!(
        get_test_state_vars,
        set_test_state_vars,
        &["generator", "test_state_vars"],
        false
    );

    impl_string_config!(
        get_log_min_level,
        set_log_min_level,
        &["log", "min_level"],
        DEFAULT_LOG_MIN_LEVEL
    );

    /// Répertoire de sortie, relatif au répertoire de configuration quand il
    /// n'est pas absolu. Il n'est pas créé ici.
    pub fn get_output_dir(&self) -> Result<PathBuf> {
        let dir = match self.get_value(&["generator", "output_dir"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => s,
            _ => DEFAULT_OUTPUT_DIR.to_string(),
        };
        let path = Path::new(&dir);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.config_dir.join(path))
        }
    }

    pub fn set_output_dir(&self, directory: String) -> Result<()> {
        self.set_value(&["generator", "output_dir"], Value::String(directory))
    }

    /// Délai des requêtes HTTP, en secondes
    pub fn get_timeout_secs(&self) -> Result<u64> {
        match self.get_value(&["network", "timeout_secs"]) {
            Ok(Value::Number(n)) => match n.as_u64() {
                Some(secs) if secs > 0 => Ok(secs),
                _ => {
                    warn!(value = %n, "Invalid network timeout, using default {}", DEFAULT_TIMEOUT_SECS);
                    Ok(DEFAULT_TIMEOUT_SECS)
                }
            },
            Ok(Value::String(s)) => match s.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(secs),
                _ => {
                    warn!(value = %s, "Invalid network timeout, using default {}", DEFAULT_TIMEOUT_SECS);
                    Ok(DEFAULT_TIMEOUT_SECS)
                }
            },
            _ => Ok(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn set_timeout_secs(&self, secs: u64) -> Result<()> {
        self.set_value(&["network", "timeout_secs"], Value::Number(Number::from(secs)))
    }
}

fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((first, rest)) = path.split_first() else {
        *data = value;
        return Ok(());
    };
    let Value::Mapping(map) = data else {
        return Err(anyhow!("Current node is not a map"));
    };

    let key = Value::String(first.to_lowercase());
    if rest.is_empty() {
        map.insert(key, value);
        return Ok(());
    }
    let entry = map.entry(key).or_insert(Value::Mapping(Mapping::new()));
    set_value_internal(entry, rest, value)
}

fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
    let mut current = data;
    for (i, key) in path.iter().enumerate() {
        let Value::Mapping(map) = current else {
            return Err(anyhow!("Path {} is not a mapping", path[..i].join(".")));
        };
        current = map
            .get(&Value::String(key.to_lowercase()))
            .ok_or_else(|| anyhow!("Path {} does not exist", path[..=i].join(".")))?;
    }
    Ok(current.clone())
}

/// Applique les variables `PMOGEN_CONFIG__A__B=valeur` au document
fn apply_overrides<I>(config: &mut Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let key_path: Vec<&str> = stripped.split("__").filter(|k| !k.is_empty()).collect();
        if key_path.is_empty() {
            continue;
        }
        debug!(key = %key, "Applying configuration override");
        if let Err(err) = set_value_internal(config, &key_path, convert_value(&value)) {
            warn!(key = %key, error = %err, "Configuration override ignored");
        }
    }
}

fn convert_value(value: &str) -> Value {
    serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

fn lower_keys_value(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, lower_keys_value(v))
                })
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys_value).collect()),
        _ => value,
    }
}

/// Fusionne récursivement `external` dans `default` : les mappings sont
/// fusionnés clé par clé, scalaires et séquences sont remplacés.
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
