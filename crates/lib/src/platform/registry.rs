use super::flags::{self, Flag, bool_value};
use super::paths::to_cmake_path;
use super::{Architecture, BeforeBuild, FlagContext, Platform};

const ANDROID_API_LEVEL: &str = "android-21";

const HOST_ARCHITECTURES: &[Architecture] = &[Architecture::new("Host", desktop_flags)];

const ANDROID_ARCHITECTURES: &[Architecture] = &[
  android("armeabi-v7a"),
  android("arm64-v8a"),
  android("x86"),
  android("x86_64"),
];

const IOS_ARCHITECTURES: &[Architecture] = &[
  ios("i386"),
  ios("x86_64"),
  ios("armv7"),
  ios("armv7s"),
  ios("arm64"),
  ios("all-os"),
  ios("all-sim"),
];

const MACOS_ARCHITECTURES: &[Architecture] = &[Architecture::new("Host", macos_flags).with_generator("Xcode")];

const MINGW_ARCHITECTURES: &[Architecture] =
  &[Architecture::new("Host", desktop_flags).with_generator("MinGW Makefiles")];

/// Registered platforms. The first entry is the host default.
pub static PLATFORMS: &[Platform] = &[
  Platform::new("Host", HOST_ARCHITECTURES).with_generator(host_generator),
  Platform::new("Android", ANDROID_ARCHITECTURES),
  Platform::new("iOS", IOS_ARCHITECTURES),
  Platform::new("macOS", MACOS_ARCHITECTURES),
  Platform::new("MinGW", MINGW_ARCHITECTURES),
  Platform::new("Ninja", HOST_ARCHITECTURES)
    .with_generator(ninja_generator)
    .serial_build_flags(),
];

const fn android(name: &'static str) -> Architecture {
  Architecture::new(name, android_flags).with_before_build(BeforeBuild::InstallAndroidStl)
}

const fn ios(name: &'static str) -> Architecture {
  Architecture::new(name, ios_flags)
    .with_build_args(ios_build_args)
    .with_generator("Xcode")
}

/// The four `RAFT_IS_*` switches plus `RAFT_ARCH`.
fn target_flags(arch: &Architecture, desktop: bool, macos: bool, android: bool, ios: bool) -> Vec<Flag> {
  vec![
    Flag::new(flags::RAFT_IS_DESKTOP, bool_value(desktop)),
    Flag::new(flags::RAFT_IS_MACOS, bool_value(macos)),
    Flag::new(flags::RAFT_IS_ANDROID, bool_value(android)),
    Flag::new(flags::RAFT_IS_IOS, bool_value(ios)),
    Flag::new(flags::RAFT_ARCH, arch.name),
  ]
}

fn desktop_flags(arch: &Architecture, _: &FlagContext<'_>) -> Vec<Flag> {
  target_flags(arch, true, false, false, false)
}

fn macos_flags(arch: &Architecture, _: &FlagContext<'_>) -> Vec<Flag> {
  target_flags(arch, true, true, false, false)
}

fn android_flags(arch: &Architecture, ctx: &FlagContext<'_>) -> Vec<Flag> {
  let toolchain = ctx.helper_dir.join("toolchains").join("android").join("android.toolchain.cmake");

  let mut result = target_flags(arch, false, false, true, false);
  result.extend([
    Flag::new(flags::ANDROID_ABI, arch.name),
    Flag::new(flags::ANDROID_STL, "c++_shared"),
    Flag::new(flags::ANDROID_NATIVE_API_LEVEL, ANDROID_API_LEVEL),
    Flag::new(flags::CMAKE_TOOLCHAIN_FILE, to_cmake_path(&toolchain)),
  ]);
  result
}

fn ios_flags(arch: &Architecture, ctx: &FlagContext<'_>) -> Vec<Flag> {
  let toolchain = ctx.helper_dir.join("toolchains").join("iOS").join("iOS.toolchain.cmake");

  let mut result = target_flags(arch, false, false, false, true);
  result.push(Flag::new(flags::CMAKE_TOOLCHAIN_FILE, to_cmake_path(&toolchain)));
  result
}

fn ios_build_args(arch: &Architecture) -> Vec<String> {
  let archs = match arch.name {
    "all-os" => vec!["arm64", "armv7"],
    "all-sim" => vec!["i386", "x86_64"],
    name => vec![name],
  };

  let sdk = match arch.name {
    "i386" | "x86_64" | "all-sim" => "iphonesimulator",
    _ => "iphoneos",
  };

  let mut args = Vec::new();
  for name in archs {
    args.push("-arch".to_string());
    args.push(name.to_string());
  }
  args.extend(
    ["-sdk", sdk, "BITCODE_GENERATION_MODE=bitcode", "OTHER_CFLAGS=-fembed-bitcode"]
      .into_iter()
      .map(String::from),
  );
  args
}

fn host_generator() -> Option<&'static str> {
  if cfg!(windows) { Some("Visual Studio 17 2022") } else { None }
}

fn ninja_generator() -> Option<&'static str> {
  Some("Ninja")
}
